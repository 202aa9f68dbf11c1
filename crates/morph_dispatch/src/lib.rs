//! Morph Dispatch - method resolution and invocation dispatch.
//!
//! This crate is the runtime half of the call-adaptation engine. A proxy host
//! intercepts calls on an adapter-facing interface, hands each one to an
//! `Adapter` as an `Invocation`, and the adapter forwards it to a target
//! object whose methods use different (but paired) types.
//!
//! # Architecture
//!
//! - `AdapterShape`: registry + target dispatch table + resolution cache,
//!   shared by every adapter of the shape
//! - `MethodResolver`: adapter method -> `InvocationInfo`, cached in a
//!   concurrent `MethodCache`
//! - `Adapter`: per-call argument mapping, target invocation, async
//!   completion and result mapping
//! - `ValueMapper`: the value-conversion boundary, implemented elsewhere
//!
//! # Flow
//!
//! ```text
//! Invocation -> resolve (cached) -> map arguments -> invoke target
//!            -> [await] -> map result -> write back by-ref outputs
//! ```

mod cache;
mod dispatcher;
mod errors;
mod info;
mod invocation;
mod mapper;
mod method;
mod resolver;
mod shape;
mod target;
mod value;

use std::sync::Once;

pub use cache::MethodCache;
pub use dispatcher::{Adapter, AdapterTask, Dispatched};
pub use errors::DispatchError;
pub use info::{InvocationInfo, ResultRemap};
pub use invocation::{CallOutcome, Invocation};
pub use mapper::{IdentityMapper, MapperError, ValueMapper};
pub use method::{AdapterMethod, Signature};
pub use resolver::MethodResolver;
pub use shape::{AdapterShape, ShapeBuilder};
pub use target::{Fault, TargetFuture, TargetMethod, TargetReturn, TargetType, TargetTypeBuilder};
pub use value::{Record, Value};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=morph_dispatch=debug` for resolutions or `=trace` for every
/// dispatch step.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // Another subscriber may already be installed by the host.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
