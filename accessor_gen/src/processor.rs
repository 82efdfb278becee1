use crate::class_blob_emitter::{ClassBlob, ClassBlobEmitter};
use crate::class_sink::ClassSink;
use crate::field_descriptor::FieldDescriptor;
use crate::gen_error::{GenError, GenResult};
use crate::generated_class_spec::GeneratedClassSpec;
use class_file::class_file_version::ClassFileVersion;
use log::{debug, info, warn};
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// run the batch on the rayon pool
    pub parallel: bool,
    pub class_version: ClassFileVersion,
}

impl Default for ProcessorConfig {
    fn default() -> ProcessorConfig {
        ProcessorConfig {
            parallel: true,
            class_version: ClassFileVersion::Jdk8,
        }
    }
}

/// What happened to one input field. `result` holds the generated class name.
#[derive(Debug, PartialEq)]
pub struct FieldOutcome {
    pub owner_type_name: String,
    pub field_name: String,
    pub result: GenResult<String>,
}

/// One outcome per input field, in input order.
#[derive(Debug, Default, PartialEq)]
pub struct BatchReport {
    pub outcomes: Vec<FieldOutcome>,
}

impl BatchReport {
    pub fn stored(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_deref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&FieldOutcome, &GenError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|e| (outcome, e)))
    }

    pub fn success_count(&self) -> usize {
        self.stored().count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Runs field descriptors through naming, emission and the sink.
///
/// Keeps no state between fields: every field is derived and emitted on its own,
/// and a failure only ends that one field. Emission may run on the rayon pool,
/// but the sink always receives the classes in input order, so the output of a
/// batch does not depend on scheduling.
#[derive(Debug, Default)]
pub struct AccessorProcessor {
    config: ProcessorConfig,
    emitter: ClassBlobEmitter,
}

impl AccessorProcessor {
    pub fn new(config: ProcessorConfig) -> AccessorProcessor {
        AccessorProcessor {
            config,
            emitter: ClassBlobEmitter::new(config.class_version),
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Returns the generated class name once the sink has accepted the blob.
    pub fn process_field(&self, field: &FieldDescriptor, sink: &dyn ClassSink) -> GenResult<String> {
        let (internal_name, blob) = self.emit_field(field)?;
        sink.store(&internal_name, blob)?;
        Ok(internal_name)
    }

    pub fn process(&self, fields: &[FieldDescriptor], sink: &dyn ClassSink) -> BatchReport {
        info!(
            "generating accessors for {} fields ({})",
            fields.len(),
            if self.config.parallel { "parallel" } else { "sequential" }
        );
        let emitted: Vec<GenResult<(String, ClassBlob)>> = if self.config.parallel {
            fields.par_iter().map(|field| self.emit_field(field)).collect()
        } else {
            fields.iter().map(|field| self.emit_field(field)).collect()
        };
        // 按输入顺序写入：jar 条目顺序和同名冲突的结果都与线程调度无关
        let outcomes: Vec<FieldOutcome> = fields
            .iter()
            .zip(emitted)
            .map(|(field, emitted)| {
                let result = emitted.and_then(|(internal_name, blob)| {
                    sink.store(&internal_name, blob)?;
                    Ok(internal_name)
                });
                Self::outcome(field, result)
            })
            .collect();
        let report = BatchReport { outcomes };
        info!(
            "stored {} classes, {} fields failed",
            report.success_count(),
            report.failure_count()
        );
        report
    }

    fn emit_field(&self, field: &FieldDescriptor) -> GenResult<(String, ClassBlob)> {
        let spec = GeneratedClassSpec::from_field(field)?;
        let blob = self.emitter.emit_spec(&spec)?;
        Ok((spec.internal_name, blob))
    }

    fn outcome(field: &FieldDescriptor, result: GenResult<String>) -> FieldOutcome {
        match &result {
            Ok(class_name) => debug!(
                "{}.{} -> {}",
                field.owner_type_name, field.field_name, class_name
            ),
            Err(e) => warn!(
                "{}.{} ({}) skipped: {}",
                field.owner_type_name, field.field_name, field.semantic_type, e
            ),
        }
        FieldOutcome {
            owner_type_name: field.owner_type_name.clone(),
            field_name: field.field_name.clone(),
            result,
        }
    }
}
