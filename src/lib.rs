//! Mixin-driven rewriting of JVM class files
//!
//! A host class loader hands every class it is about to define to [`weave::Engine::modify_class`].
//! The engine decides whether any of the *mixins* registered by external modules target that
//! class, and if so parses the class file, applies the mixins in order (class level, then
//! fields, then methods, then method code), and hands back the re-serialized result. Classes no
//! mixin cares about cost one name lookup and nothing else.
//!
//! ### Simple example
//!
//! Registering a class mixin that marks `net/game/Entity` as `final`:
//!
//! ```
//! use classweave::jvm::ClassAccessFlags;
//! use classweave::jvm::class_file::ClassFile;
//! use classweave::weave::{Engine, MixinDescriptor, MixinTarget, NameType, NoMappings};
//!
//! // A scanner is anything that yields mixin descriptors; a closure works
//! let scanner = Box::new(|| {
//!     vec![MixinDescriptor::class(
//!         MixinTarget {
//!             class_name: String::from("net/game/Entity"),
//!             name_type: NameType::Default,
//!             priority: 0,
//!         },
//!         "example-module",
//!         Box::new(|class: &ClassFile| {
//!             let mut patched = class.clone();
//!             patched.access_flags |= ClassAccessFlags::FINAL;
//!             Ok(patched)
//!         }),
//!     )]
//! });
//!
//! let engine = Engine::new(scanner, Box::new(NoMappings));
//!
//! // Probe mode: absent bytes ask "would you modify this class?" without any parsing.
//! // An empty answer means "yes, send me the bytes"; `None` means "skip me entirely".
//! assert_eq!(engine.modify_class("net.game.Entity", None), Some(vec![]));
//! assert_eq!(engine.modify_class("net/game/Other", None), None);
//! ```
//!
//! In transform mode (bytes present) the same call returns `None` for "define the class as-is"
//! or the replacement class file bytes. No mixin failure, parse failure, or panic ever
//! propagates to the loader; the fail-safe answer is always "no change".

pub mod jvm;
pub mod util;
pub mod weave;
