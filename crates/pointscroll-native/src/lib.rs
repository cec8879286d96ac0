//! Host-only helpers shared by the `pointscroll-native` binary and its tests.

pub mod gltf_source;
