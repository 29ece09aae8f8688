//! End-to-end tests of the host-facing contract
//!
//! Input classes are built through the crate's own codec, registered mixins come from closure
//! scanners, and every assertion goes through `Engine::modify_class` the way a class loader
//! would call it.

use classweave::jvm::class_file::{
    AttributeLike, BytecodeArray, ClassFile, Code, ConstantPool, Field, Method, Version,
};
use classweave::jvm::{ClassAccessFlags, FieldAccessFlags, MethodAccessFlags};
use classweave::weave::{
    ClassMapping, Engine, MappingTable, MemberMapping, MixinDescriptor, MixinError, MixinTarget,
    NameType, NoMappings,
};
use std::cell::RefCell;
use std::rc::Rc;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn target(class_name: &str, name_type: NameType, priority: i32) -> MixinTarget {
    MixinTarget {
        class_name: class_name.to_owned(),
        name_type,
        priority,
    }
}

/// `class a/b/C { int count; void run() {} ; native void stop(); }`
fn sample_class() -> ClassFile {
    let mut constants = ConstantPool::new();

    let this_name = constants.get_utf8("a/b/C").unwrap();
    let this_class = constants.get_class(this_name).unwrap();
    let super_name = constants.get_utf8("java/lang/Object").unwrap();
    let super_class = constants.get_class(super_name).unwrap();

    let count_name = constants.get_utf8("count").unwrap();
    let int_descriptor = constants.get_utf8("I").unwrap();

    let run_name = constants.get_utf8("run").unwrap();
    let void_signature = constants.get_utf8("()V").unwrap();
    let code = Code {
        max_stack: 1,
        max_locals: 1,
        // return
        code_array: BytecodeArray(vec![0xb1]),
        exception_table: vec![],
        attributes: vec![],
    };
    let code_attribute = constants.get_attribute(code).unwrap();

    let stop_name = constants.get_utf8("stop").unwrap();

    ClassFile {
        version: Version::JAVA8,
        constants,
        access_flags: ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
        this_class,
        super_class,
        interfaces: vec![],
        fields: vec![Field {
            access_flags: FieldAccessFlags::PRIVATE,
            name_index: count_name,
            descriptor_index: int_descriptor,
            attributes: vec![],
        }],
        methods: vec![
            Method {
                access_flags: MethodAccessFlags::PUBLIC,
                name_index: run_name,
                descriptor_index: void_signature,
                attributes: vec![code_attribute],
            },
            Method {
                access_flags: MethodAccessFlags::PUBLIC | MethodAccessFlags::NATIVE,
                name_index: stop_name,
                descriptor_index: void_signature,
                attributes: vec![],
            },
        ],
        attributes: vec![],
    }
}

fn sample_class_bytes() -> Vec<u8> {
    sample_class().encode().unwrap()
}

fn no_mixins() -> Vec<MixinDescriptor> {
    vec![]
}

#[test]
fn no_mixins_registered() {
    init_logs();
    let engine = Engine::new(Box::new(no_mixins), Box::new(NoMappings));

    assert!(engine.mixins().is_empty());
    assert_eq!(engine.modify_class("a/b/C", None), None);
    assert_eq!(engine.modify_class("a/b/C", Some(&sample_class_bytes())), None);
}

#[test]
fn unrelated_mixins_leave_a_class_alone() {
    init_logs();
    let scanner = || {
        vec![MixinDescriptor::class(
            target("x/Y", NameType::Default, 0),
            "other-module",
            Box::new(|class: &ClassFile| Ok(class.clone())),
        )]
    };
    let engine = Engine::new(Box::new(scanner), Box::new(NoMappings));

    assert_eq!(engine.modify_class("a/b/C", None), None);
    assert_eq!(engine.modify_class("a/b/C", Some(&sample_class_bytes())), None);
}

#[test]
fn default_class_mixin_probes_and_transforms() {
    init_logs();
    let scanner = || {
        vec![MixinDescriptor::class(
            target("a/b/C", NameType::Default, 0),
            "finalizer",
            Box::new(|class: &ClassFile| {
                let mut patched = class.clone();
                patched.access_flags |= ClassAccessFlags::FINAL;
                Ok(patched)
            }),
        )]
    };
    let engine = Engine::new(Box::new(scanner), Box::new(NoMappings));

    // Probe answer: empty bytes mean "modification needed"
    assert_eq!(engine.modify_class("a/b/C", None), Some(vec![]));

    let input = sample_class_bytes();
    let output = engine.modify_class("a/b/C", Some(&input)).unwrap();
    assert_ne!(output, input);

    let rewritten = ClassFile::parse_bytes(&output).unwrap();
    assert!(rewritten.access_flags.contains(ClassAccessFlags::FINAL));
    assert_eq!(rewritten.this_class_name(), Some("a/b/C"));
}

#[test]
fn dotted_and_slashed_forms_are_interchangeable() {
    init_logs();
    let scanner = || {
        vec![MixinDescriptor::class(
            target("a.b.C", NameType::Default, 0),
            "dotted",
            Box::new(|class: &ClassFile| Ok(class.clone())),
        )]
    };
    let engine = Engine::new(Box::new(scanner), Box::new(NoMappings));

    assert_eq!(engine.modify_class("a/b/C", None), Some(vec![]));
    assert_eq!(engine.modify_class("a.b.C", None), Some(vec![]));
    assert_eq!(engine.modify_class("a.b.D", None), None);
}

#[test]
fn empty_class_data_is_probe_mode() {
    init_logs();
    let scanner = || {
        vec![MixinDescriptor::class(
            target("a/b/C", NameType::Default, 0),
            "prober",
            Box::new(|class: &ClassFile| Ok(class.clone())),
        )]
    };
    let engine = Engine::new(Box::new(scanner), Box::new(NoMappings));

    assert_eq!(engine.modify_class("a/b/C", Some(&[])), Some(vec![]));
    assert_eq!(engine.modify_class("x/Y", Some(&[])), None);
}

#[test]
fn mapped_name_mixin_matches_the_runtime_class_only() {
    init_logs();
    let mappings = MappingTable::new(vec![ClassMapping {
        mapped: String::from("net/game/Entity"),
        obfuscated: String::from("a/b/C"),
        members: vec![],
    }]);
    let scanner = || {
        vec![MixinDescriptor::class(
            target("net/game/Entity", NameType::Mapped, 0),
            "mapped-module",
            Box::new(|class: &ClassFile| Ok(class.clone())),
        )]
    };
    let engine = Engine::new(Box::new(scanner), Box::new(mappings));

    assert_eq!(engine.modify_class("a/b/C", None), Some(vec![]));
    assert_eq!(engine.modify_class("net/game/Entity", None), None);
}

#[test]
fn mapped_member_rows_translate_method_names() {
    init_logs();
    let mappings = MappingTable::new(vec![ClassMapping {
        mapped: String::from("net/game/Entity"),
        obfuscated: String::from("a/b/C"),
        members: vec![MemberMapping {
            mapped: String::from("tick"),
            obfuscated: String::from("run"),
        }],
    }]);
    let scanner = || {
        vec![MixinDescriptor::method(
            target("net/game/Entity", NameType::Mapped, 0),
            "mapped-module",
            "tick",
            "()V",
            Box::new(|_: &mut ClassFile, method: &Method| {
                let mut synchronized = method.clone();
                synchronized.access_flags |= MethodAccessFlags::SYNCHRONIZED;
                Ok(synchronized)
            }),
        )]
    };
    let engine = Engine::new(Box::new(scanner), Box::new(mappings));

    let output = engine
        .modify_class("a/b/C", Some(&sample_class_bytes()))
        .unwrap();
    let rewritten = ClassFile::parse_bytes(&output).unwrap();
    assert!(rewritten.methods[0]
        .access_flags
        .contains(MethodAccessFlags::SYNCHRONIZED));
}

#[test]
fn method_mixins_chain_in_priority_order() {
    init_logs();
    let observed = Rc::new(RefCell::new(Vec::<String>::new()));

    let scanner = {
        let observed = Rc::clone(&observed);
        move || {
            let observed = Rc::clone(&observed);
            vec![
                // Discovered first but runs second
                MixinDescriptor::method(
                    target("a/b/C", NameType::Default, 20),
                    "observer",
                    "run",
                    "()V",
                    Box::new(move |class: &mut ClassFile, method: &Method| {
                        let name = method.name(&class.constants).unwrap_or("?").to_owned();
                        observed.borrow_mut().push(name);
                        Ok(method.clone())
                    }),
                ),
                MixinDescriptor::method(
                    target("a/b/C", NameType::Default, 10),
                    "renamer",
                    "run",
                    "()V",
                    Box::new(|class: &mut ClassFile, method: &Method| {
                        let mut renamed = method.clone();
                        renamed.name_index = class.constants.get_utf8("run_v1")?;
                        Ok(renamed)
                    }),
                ),
            ]
        }
    };
    let engine = Engine::new(Box::new(scanner), Box::new(NoMappings));

    let output = engine
        .modify_class("a/b/C", Some(&sample_class_bytes()))
        .unwrap();

    // The lower-priority mixin ran first, so the observer saw its rename
    assert_eq!(*observed.borrow(), vec![String::from("run_v1")]);

    let rewritten = ClassFile::parse_bytes(&output).unwrap();
    assert_eq!(rewritten.methods[0].name(&rewritten.constants), Some("run_v1"));
    // The replacement landed at the method's original index; nothing else moved
    assert_eq!(rewritten.methods[1].name(&rewritten.constants), Some("stop"));
}

#[test]
fn code_mixin_rewrites_the_code_attribute_in_place() {
    init_logs();
    let scanner = || {
        vec![MixinDescriptor::method_code(
            target("a/b/C", NameType::Default, 0),
            "stack-bumper",
            "run",
            "()V",
            Box::new(|_: &mut ClassFile, code: &Code| {
                let mut widened = code.clone();
                widened.max_stack = 5;
                Ok(widened)
            }),
        )]
    };
    let engine = Engine::new(Box::new(scanner), Box::new(NoMappings));

    let output = engine
        .modify_class("a/b/C", Some(&sample_class_bytes()))
        .unwrap();
    let rewritten = ClassFile::parse_bytes(&output).unwrap();

    let run = &rewritten.methods[0];
    let code_index = run
        .attribute_index(&rewritten.constants, Code::NAME)
        .unwrap();
    let code = Code::parse_bytes(&run.attributes[code_index].info).unwrap();
    assert_eq!(code.max_stack, 5);
    assert_eq!(code.code_array, BytecodeArray(vec![0xb1]));
}

#[test]
fn code_mixin_on_a_method_without_code_is_skipped() {
    init_logs();
    let scanner = || {
        vec![MixinDescriptor::method_code(
            target("a/b/C", NameType::Default, 0),
            "code-module",
            "stop",
            "()V",
            Box::new(|_: &mut ClassFile, code: &Code| Ok(code.clone())),
        )]
    };
    let engine = Engine::new(Box::new(scanner), Box::new(NoMappings));

    // `stop` is native: the probe still answers, the transform silently skips
    assert_eq!(engine.modify_class("a/b/C", None), Some(vec![]));
    assert_eq!(engine.modify_class("a/b/C", Some(&sample_class_bytes())), None);
}

#[test]
fn failing_field_mixin_is_isolated() {
    init_logs();
    let seen_by_second = Rc::new(RefCell::new(Vec::<FieldAccessFlags>::new()));

    let scanner = {
        let seen_by_second = Rc::clone(&seen_by_second);
        move || {
            let seen_by_second = Rc::clone(&seen_by_second);
            vec![
                MixinDescriptor::field(
                    target("a/b/C", NameType::Default, 1),
                    "broken-module",
                    "count",
                    "I",
                    Box::new(|_: &mut ClassFile, _: &Field| {
                        Err(MixinError::new("intentional failure"))
                    }),
                ),
                MixinDescriptor::field(
                    target("a/b/C", NameType::Default, 2),
                    "working-module",
                    "count",
                    "I",
                    Box::new(move |_: &mut ClassFile, field: &Field| {
                        seen_by_second.borrow_mut().push(field.access_flags);
                        let mut hardened = field.clone();
                        hardened.access_flags |= FieldAccessFlags::FINAL;
                        Ok(hardened)
                    }),
                ),
            ]
        }
    };
    let engine = Engine::new(Box::new(scanner), Box::new(NoMappings));

    let output = engine
        .modify_class("a/b/C", Some(&sample_class_bytes()))
        .unwrap();

    // The second mixin saw the original field, not a half-applied one
    assert_eq!(*seen_by_second.borrow(), vec![FieldAccessFlags::PRIVATE]);

    let rewritten = ClassFile::parse_bytes(&output).unwrap();
    assert_eq!(
        rewritten.fields[0].access_flags,
        FieldAccessFlags::PRIVATE | FieldAccessFlags::FINAL
    );
}

#[test]
fn panicking_mixin_is_isolated_like_a_failing_one() {
    init_logs();
    let scanner = || {
        vec![
            MixinDescriptor::class(
                target("a/b/C", NameType::Default, 1),
                "panicky-module",
                Box::new(|_: &ClassFile| panic!("mixin bug")),
            ),
            MixinDescriptor::class(
                target("a/b/C", NameType::Default, 2),
                "steady-module",
                Box::new(|class: &ClassFile| {
                    let mut patched = class.clone();
                    patched.access_flags |= ClassAccessFlags::FINAL;
                    Ok(patched)
                }),
            ),
        ]
    };
    let engine = Engine::new(Box::new(scanner), Box::new(NoMappings));

    let output = engine
        .modify_class("a/b/C", Some(&sample_class_bytes()))
        .unwrap();
    let rewritten = ClassFile::parse_bytes(&output).unwrap();
    assert!(rewritten.access_flags.contains(ClassAccessFlags::FINAL));
}

#[test]
fn every_applicable_mixin_failing_means_no_change() {
    init_logs();
    let scanner = || {
        vec![MixinDescriptor::class(
            target("a/b/C", NameType::Default, 0),
            "broken-module",
            Box::new(|_: &ClassFile| Err(MixinError::new("nope"))),
        )]
    };
    let engine = Engine::new(Box::new(scanner), Box::new(NoMappings));

    assert_eq!(engine.modify_class("a/b/C", Some(&sample_class_bytes())), None);
}

#[test]
fn unparseable_bytes_mean_no_change() {
    init_logs();
    let scanner = || {
        vec![MixinDescriptor::class(
            target("a/b/C", NameType::Default, 0),
            "module",
            Box::new(|class: &ClassFile| Ok(class.clone())),
        )]
    };
    let engine = Engine::new(Box::new(scanner), Box::new(NoMappings));

    assert_eq!(engine.modify_class("a/b/C", Some(b"not a class file")), None);
}

#[test]
fn unknown_name_type_never_matches() {
    init_logs();
    let scanner = || {
        vec![MixinDescriptor::class(
            target("a/b/C", NameType::Unknown(42), 0),
            "future-module",
            Box::new(|class: &ClassFile| Ok(class.clone())),
        )]
    };
    let engine = Engine::new(Box::new(scanner), Box::new(NoMappings));

    assert_eq!(engine.modify_class("a/b/C", None), None);
    assert_eq!(engine.modify_class("a/b/C", Some(&sample_class_bytes())), None);
}

#[test]
fn rescan_replaces_the_index() {
    init_logs();
    let enabled = Rc::new(RefCell::new(false));

    let scanner = {
        let enabled = Rc::clone(&enabled);
        move || {
            if !*enabled.borrow() {
                return vec![];
            }
            vec![MixinDescriptor::class(
                target("a/b/C", NameType::Default, 0),
                "late-module",
                Box::new(|class: &ClassFile| Ok(class.clone())),
            )]
        }
    };
    let mut engine = Engine::new(Box::new(scanner), Box::new(NoMappings));

    assert_eq!(engine.modify_class("a/b/C", None), None);

    *enabled.borrow_mut() = true;
    engine.rescan();
    assert_eq!(engine.mixins().len(), 1);
    assert_eq!(engine.modify_class("a/b/C", None), Some(vec![]));
}
