/// Button capability and the simulated panel.
pub mod button_service;
/// Virtual gestures and debug button controls.
pub mod control_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Server and team-name draws for new matches.
pub mod match_setup;
/// Single-writer scoring loop.
pub mod scoring_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events streaming service.
pub mod sse_service;
/// WebSocket connection and message handling service.
pub mod websocket_service;
