//! Feature-gated pool families, the [`PoolBox`] dispatch enum and the
//! immutable [`PoolSnapshot`] the router reads.
//!
//! Each family sits behind its own Cargo feature.  [`PoolBox`] dispatches
//! statically over the enabled families, so a snapshot is a plain
//! `Vec<PoolBox>` with no `dyn` trait objects.
//!
//! # Pool Families
//!
//! | Feature | Pool | Invariant |
//! |---------|------|-----------|
//! | `weighted` | [`WeightedPool`] | Weighted product (Weighted, LBP, Investment) |
//! | `stable` | [`StablePool`] | StableSwap (Stable, MetaStable) |
//! | `stable` | [`ComposableStablePool`] | StableSwap with BPT as a token (PhantomStable, ComposableStable) |
//! | `linear` | [`LinearPool`] | Piecewise linear main/wrapped/BPT |
//! | `gyro` | [`Gyro2Pool`] | 2-CLP concentrated product |
//! | `gyro` | [`Gyro3Pool`] | 3-CLP cubic |
//! | `gyro` | [`GyroEPool`] | Rotated ellipse (E-CLP) |
//! | `fx` | [`FxPool`] | Oracle-rate micro-fee curve |

mod common;
#[cfg(feature = "stable")]
pub mod composable_stable;
#[cfg(feature = "fx")]
pub mod fx;
#[cfg(feature = "fx")]
mod fx_math;
#[cfg(feature = "gyro")]
pub mod gyro2;
#[cfg(feature = "gyro")]
pub mod gyro3;
#[cfg(feature = "gyro")]
pub mod gyro_e;
#[cfg(feature = "gyro")]
mod gyro_e_math;
#[cfg(feature = "gyro")]
mod gyro_math;
#[cfg(feature = "linear")]
pub mod linear;
#[cfg(feature = "linear")]
mod linear_math;
mod pool_box;
mod snapshot;
#[cfg(feature = "stable")]
pub mod stable;
#[cfg(feature = "stable")]
mod stable_math;
#[cfg(feature = "weighted")]
pub mod weighted;

#[cfg(all(test, feature = "weighted", feature = "stable"))]
#[allow(clippy::panic)]
mod proptest_properties;

#[cfg(feature = "stable")]
pub use composable_stable::ComposableStablePool;
#[cfg(feature = "fx")]
pub use fx::FxPool;
#[cfg(feature = "gyro")]
pub use gyro2::Gyro2Pool;
#[cfg(feature = "gyro")]
pub use gyro3::Gyro3Pool;
#[cfg(feature = "gyro")]
pub use gyro_e::GyroEPool;
#[cfg(feature = "linear")]
pub use linear::LinearPool;
pub use pool_box::PoolBox;
pub use snapshot::PoolSnapshot;
#[cfg(feature = "stable")]
pub use stable::StablePool;
#[cfg(feature = "weighted")]
pub use weighted::WeightedPool;
