//! # Silo Core
//!
//! A silo is a capacity-bounded container with a two-phase lifecycle: it
//! collects owned items until it is full, then seals itself and only hands
//! items back out. The right to mutate a silo is an [`AdminCapability`], a
//! transferable token minted together with the silo.
//!
//! ```
//! use silo_core::Silo;
//!
//! let (mut silo, cap) = Silo::create(2);
//! silo.add_item(&cap, "x").unwrap();
//! silo.add_item(&cap, "y").unwrap();
//! assert!(silo.is_ready());
//!
//! assert_eq!(silo.remove_item(&cap), Ok("y"));
//! assert_eq!(silo.remove_all(&cap), Ok(vec!["x"]));
//! silo.destroy(&cap).unwrap();
//! ```

pub mod capability;
pub mod config;
pub mod error;
pub mod events;
pub mod id;
pub mod shared;
pub mod silo;
pub mod store;

pub use capability::{AdminCapability, Credential};
pub use config::{AuthMode, SiloConfig, ZeroCapacity};
pub use error::{ConfigError, Rejected, Result, SiloError};
pub use events::{EventLog, EventSink, NullSink, SiloEvent, TracingSink};
pub use id::{CapabilityId, IdSource, RandomIds, SequentialIds, SiloId};
pub use shared::SharedSilo;
pub use silo::{Silo, SiloState};
pub use store::{Empty, SequenceStore, VecStore};
