//! Thornvale Gateway - messaging-fronted ingress for generation requests

pub mod service;
pub mod transport;

pub use service::{
    run_ingress_forwarder, Gateway, GenerationHandler, INGRESS_CAPACITY, REQUEST_SUBJECT_PATTERN,
};
pub use transport::{MessageStream, NatsTransport, Publisher, Subscriber, TransportMessage};
