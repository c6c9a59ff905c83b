pub mod residual;

pub use self::residual::ResidualNetwork;
