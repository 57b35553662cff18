//! Benchmarks for the Wardrobe transforms. See `benches/`.
