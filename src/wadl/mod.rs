//! # API Description
//!
//! The resource descriptor model, the WADL loader that populates it, and the
//! schema collaborator used for payload synthesis.

pub mod loader;
pub mod model;
pub mod schema;

pub use loader::{load_application, parse_application};
pub use model::{Application, Method, QName, Representation, Request, Resource, ResourceItem, Resources};
pub use schema::{SchemaDocument, SchemaInstanceGenerator, SkeletonGenerator};
