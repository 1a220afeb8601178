//! # Services Layer
//!
//! Services used by the request engine. Each one abstracts an external
//! resource behind a trait so the engine can be driven without a network or
//! an editor:
//! - the HTTP transport
//! - payload resolution (live read, schema synthesis, edit step)

pub mod http;
pub mod mock;
pub mod payload;

pub use http::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use mock::MockTransport;
pub use payload::{
    choose_representation, ExternalEditor, Payload, PayloadEditor, PayloadResolver, PayloadTarget,
    RepresentationChoice,
};
