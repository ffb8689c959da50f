//! HTTP adapter for the chat and review endpoints.
//!
//! Both endpoints take and return JSON:
//!
//! | Endpoint | Request | Response |
//! |----------|---------|----------|
//! | `POST /chat` | `{ "messages": [...] }` | `{ "reply": "..." }` |
//! | `POST /review` | `{ "rating": "good", "messages": [...] }` | loose ack |

mod gateway;

pub use gateway::HttpChatGateway;
