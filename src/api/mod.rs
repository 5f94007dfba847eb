// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod server;
pub mod websocket;

pub use errors::{ApiError, ErrorResponse};
pub use handlers::HealthResponse;
pub use server::{create_router, ApiServer, AppState};
