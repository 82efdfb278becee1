use crate::utils::read_accessor;
use accessor_gen::class_sink::{DirectoryClassSink, JarClassSink, MemoryClassSink};
use accessor_gen::discovery::{flatten, AnnotatedElement, DeclaredField};
use accessor_gen::field_descriptor::FieldDescriptor;
use accessor_gen::gen_error::GenError;
use accessor_gen::processor::{AccessorProcessor, ProcessorConfig};
use accessor_gen::semantic_type::{PrimitiveKind, SemanticType};
use std::fs;
use tempfile::tempdir;

fn mixed_batch() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new(
            "com.example.Person",
            "age",
            SemanticType::Primitive(PrimitiveKind::Int32),
        ),
        FieldDescriptor::new(
            "com.example.Person",
            "nothing",
            SemanticType::Unsupported("void".to_string()),
        ),
        FieldDescriptor::new(
            "com.example.Account",
            "balance",
            SemanticType::Primitive(PrimitiveKind::Float64),
        ),
    ]
}

#[test]
fn test_one_bad_field_does_not_affect_the_others() {
    for parallel in [false, true] {
        let sink = MemoryClassSink::new();
        let processor = AccessorProcessor::new(ProcessorConfig {
            parallel,
            ..ProcessorConfig::default()
        });
        let report = processor.process(&mixed_batch(), &sink);

        assert_eq!(2, sink.len());
        assert_eq!(2, report.success_count());
        assert_eq!(1, report.failure_count());
        let failures: Vec<_> = report.failures().collect();
        assert_eq!("nothing", failures[0].0.field_name);
        assert_eq!(&GenError::UnsupportedTypeKind("void".to_string()), failures[0].1);

        let balance = read_accessor(&sink.get("com/example/Accountgen").unwrap());
        assert_eq!("getBalance", balance.method.name);
        assert_eq!("()D", balance.method.descriptor);
        assert!(sink.get("com/example/Persongen").is_some());
    }
}

#[test]
fn test_same_owner_twice_collides_in_the_sink() {
    // the naming convention gives one class per owner, so a second field of the
    // same owner is reported by the sink instead of overwriting the first
    let fields = vec![
        FieldDescriptor::new(
            "com.example.Point",
            "x",
            SemanticType::Primitive(PrimitiveKind::Int32),
        ),
        FieldDescriptor::new(
            "com.example.Point",
            "y",
            SemanticType::Primitive(PrimitiveKind::Int32),
        ),
    ];
    let sink = MemoryClassSink::new();
    let report = AccessorProcessor::new(ProcessorConfig {
        parallel: false,
        ..ProcessorConfig::default()
    })
    .process(&fields, &sink);
    assert_eq!(1, report.success_count());
    assert!(matches!(
        report.outcomes[1].result,
        Err(GenError::SinkWriteFailure(_, _))
    ));
    assert_eq!(
        "getX",
        read_accessor(&sink.get("com/example/Pointgen").unwrap())
            .method
            .name
    );
}

#[test]
fn test_same_owner_collision_is_decided_by_input_order_in_parallel() {
    for _ in 0..20 {
        let fields: Vec<FieldDescriptor> = ["x", "y", "z", "w"]
            .into_iter()
            .map(|name| {
                FieldDescriptor::new(
                    "com.example.Point",
                    name,
                    SemanticType::Primitive(PrimitiveKind::Int32),
                )
            })
            .collect();
        let sink = MemoryClassSink::new();
        let report = AccessorProcessor::default().process(&fields, &sink);
        assert_eq!(1, report.success_count());
        assert!(report.outcomes[0].result.is_ok());
        assert_eq!(
            "getX",
            read_accessor(&sink.get("com/example/Pointgen").unwrap())
                .method
                .name
        );
    }
}

#[test]
fn test_parallel_jar_output_is_reproducible() {
    let fields: Vec<FieldDescriptor> = (0..64)
        .map(|i| {
            FieldDescriptor::new(
                format!("pkg.Owner{i}"),
                "value",
                SemanticType::Primitive(PrimitiveKind::Int64),
            )
        })
        .collect();
    let dir = tempdir().unwrap();
    let build = |file_name: &str| {
        let jar_path = dir.path().join(file_name);
        let sink = JarClassSink::new(&jar_path).unwrap();
        let report = AccessorProcessor::default().process(&fields, &sink);
        sink.finish().unwrap();
        assert!(report.is_success());
        fs::read(jar_path).unwrap()
    };
    let first = build("first.jar");
    for run in 0..5 {
        assert!(first == build(&format!("again{run}.jar")), "run {run} differs");
    }

    let archive = zip::ZipArchive::new(fs::File::open(dir.path().join("first.jar")).unwrap()).unwrap();
    let names: Vec<&str> = archive.file_names().collect();
    assert_eq!(65, names.len());
}

#[test]
fn test_directory_output() {
    let dir = tempdir().unwrap();
    let sink = DirectoryClassSink::new(dir.path()).unwrap();
    let report = AccessorProcessor::default().process(&mixed_batch(), &sink);
    assert_eq!(2, report.success_count());

    let bytes = fs::read(dir.path().join("com/example/Persongen.class")).unwrap();
    assert_eq!(&[0xCA, 0xFE, 0xBA, 0xBE], &bytes[..4]);
    assert!(dir.path().join("com/example/Accountgen.class").exists());
}

#[test]
fn test_jar_output() {
    let dir = tempdir().unwrap();
    let jar_path = dir.path().join("accessors.jar");
    let sink = JarClassSink::new(&jar_path).unwrap();
    let report = AccessorProcessor::default().process(&mixed_batch(), &sink);
    sink.finish().unwrap();
    assert_eq!(2, report.success_count());

    let archive = zip::ZipArchive::new(fs::File::open(&jar_path).unwrap()).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(
        vec![
            "META-INF/MANIFEST.MF",
            "com/example/Accountgen.class",
            "com/example/Persongen.class"
        ],
        names
    );
}

#[test]
fn test_class_level_annotation_batch() {
    let elements = vec![AnnotatedElement::Class {
        qualified_name: "com.example.Person".to_string(),
        fields: vec![DeclaredField::new(
            "name",
            SemanticType::reference("java.lang.String"),
        )],
    }];
    let sink = MemoryClassSink::new();
    let report = AccessorProcessor::default().process(&flatten(elements), &sink);
    assert!(report.is_success());
    let accessor = read_accessor(&sink.get("com/example/Persongen").unwrap());
    assert_eq!("getName", accessor.method.name);
    assert_eq!("()Ljava/lang/String;", accessor.method.descriptor);
}
