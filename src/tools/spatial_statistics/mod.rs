// private sub-module defined in other files
mod density_based_clustering;

// exports identifiers from private sub-modules in the current module namespace
pub use self::density_based_clustering::{
    density_based_clustering, DensityBasedClustering, NOISE_CLUSTER_ID,
};
