//! JVM class file model and binary codec
//!
//! This module round-trips the [`class` file format of the JVM][0] between raw bytes and a
//! structured model. Parsing keeps everything it reads: the constant pool is preserved in its
//! original order, and attributes the codec does not understand are carried as opaque
//! `name_index + info` payloads, so a class can be re-serialized without losing information the
//! rewriting engine never looked at.
//!
//! Only the `Code` attribute gets a structural decode (stack/locals sizing, the raw bytecode
//! array, the exception table, and nested attributes), because it is the one attribute the engine
//! rewrites through.
//!
//! [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html

mod access_flags;
pub mod class_file;
mod errors;

pub use access_flags::*;
pub use errors::*;
