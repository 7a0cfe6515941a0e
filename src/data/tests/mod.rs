//! Tests for dataset construction and sample loading.
//!
//! Scenes are written to scratch directories with the helpers in `fixtures`
//! and read back through the public loaders.
