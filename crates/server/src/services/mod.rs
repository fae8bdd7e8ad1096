//! Business logic services.
//!
//! # Services
//!
//! - `references` - Existence checks for references carried in a payload
//! - `owners`, `pets`, `vets`, `visits` - Validated writes per entity
//! - `queries` - Read views joining an entity to its related records
//!
//! Services borrow a `&dyn ClinicStore` and are cheap to build per request.

pub mod owners;
pub mod pets;
pub mod queries;
pub mod references;
pub mod vets;
pub mod visits;

pub use owners::OwnerService;
pub use pets::PetService;
pub use queries::ClinicQueries;
pub use references::ReferenceValidator;
pub use vets::VetService;
pub use visits::VisitService;
