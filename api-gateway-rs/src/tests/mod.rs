//! Routing tests driven through `tower::ServiceExt::oneshot`
//!
//! The pipeline is built by the real startup wiring against WireMock backends.
