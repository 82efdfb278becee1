// 生成结果的去向。与类加载时的 ClassPath 相反，这里只写不读
use crate::class_blob_emitter::ClassBlob;
use crate::gen_error::{GenError, GenResult};
use indexmap::IndexMap;
use log::debug;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt::{Debug, Formatter};
use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use zip::result::ZipResult;
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

const JAR_MANIFEST: &str = "META-INF/MANIFEST.MF";
const JAR_MANIFEST_CONTENT: &str = "Manifest-Version: 1.0\r\nCreated-By: accessor_gen\r\n\r\n";

/// Receives finished classes keyed by internal name.
///
/// A batch stores its classes one at a time in input order; `Sync` lets callers
/// share one sink across threads with [`crate::processor::AccessorProcessor::process_field`].
/// Storing the same name twice is an error.
pub trait ClassSink: Sync {
    fn store(&self, internal_name: &str, blob: ClassBlob) -> GenResult<()>;
}

fn sink_error(name: &str, reason: impl ToString) -> GenError {
    GenError::SinkWriteFailure(name.to_string(), reason.to_string())
}

/// Keeps classes in memory, in the order they were stored.
#[derive(Debug, Default)]
pub struct MemoryClassSink {
    classes: Mutex<IndexMap<String, ClassBlob>>,
}

impl MemoryClassSink {
    pub fn new() -> MemoryClassSink {
        MemoryClassSink::default()
    }

    pub fn get(&self, internal_name: &str) -> Option<ClassBlob> {
        self.classes.lock().get(internal_name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.classes.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.classes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.lock().is_empty()
    }

    pub fn into_classes(self) -> IndexMap<String, ClassBlob> {
        self.classes.into_inner()
    }
}

impl ClassSink for MemoryClassSink {
    fn store(&self, internal_name: &str, blob: ClassBlob) -> GenResult<()> {
        let mut classes = self.classes.lock();
        if classes.contains_key(internal_name) {
            return Err(sink_error(internal_name, "class already stored"));
        }
        classes.insert(internal_name.to_string(), blob);
        Ok(())
    }
}

/// Writes `<root>/<internal_name>.class`, package directories included.
/// Files left over from an earlier run are overwritten.
pub struct DirectoryClassSink {
    root: PathBuf,
    stored: Mutex<HashSet<String>>,
}

impl DirectoryClassSink {
    /// Creates `root` when missing.
    pub fn new(root: impl AsRef<Path>) -> GenResult<DirectoryClassSink> {
        let root = root.as_ref();
        let display = root.to_string_lossy();
        fs::create_dir_all(root).map_err(|e| sink_error(&display, e))?;
        let root = fs::canonicalize(root).map_err(|e| sink_error(&display, e))?;
        if !root.is_dir() {
            return Err(sink_error(&display, "not a directory"));
        }
        Ok(DirectoryClassSink {
            root,
            stored: Mutex::new(HashSet::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn class_path(&self, internal_name: &str) -> GenResult<PathBuf> {
        let mut path = self.root.clone();
        for segment in internal_name.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(sink_error(internal_name, "invalid class name"));
            }
            path.push(segment);
        }
        path.set_extension("class");
        Ok(path)
    }
}

impl Debug for DirectoryClassSink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DirectoryClassSink => {}", self.root.display())
    }
}

impl ClassSink for DirectoryClassSink {
    fn store(&self, internal_name: &str, blob: ClassBlob) -> GenResult<()> {
        let path = self.class_path(internal_name)?;
        if !self.stored.lock().insert(internal_name.to_string()) {
            return Err(sink_error(internal_name, "class already stored"));
        }
        let written = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| fs::write(&path, blob.as_bytes()));
        if let Err(e) = written {
            self.stored.lock().remove(internal_name);
            return Err(sink_error(internal_name, e));
        }
        debug!("wrote {}", path.display());
        Ok(())
    }
}

fn entry_options() -> FileOptions {
    FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
}

struct JarState<W: Write + Seek> {
    writer: Option<ZipWriter<W>>,
    stored: HashSet<String>,
    /// set once an entry was left half written; the archive is unusable from then on
    failure: Option<String>,
}

impl<W: Write + Seek> JarState<W> {
    fn new(inner: W) -> ZipResult<JarState<W>> {
        let mut writer = ZipWriter::new(inner);
        writer.start_file(JAR_MANIFEST, entry_options())?;
        writer.write_all(JAR_MANIFEST_CONTENT.as_bytes())?;
        Ok(JarState {
            writer: Some(writer),
            stored: HashSet::new(),
            failure: None,
        })
    }

    fn store(&mut self, internal_name: &str, bytes: &[u8]) -> GenResult<()> {
        if let Some(failure) = &self.failure {
            return Err(sink_error(
                internal_name,
                format!("jar unusable after an earlier failure: {failure}"),
            ));
        }
        if self.stored.contains(internal_name) {
            return Err(sink_error(internal_name, "class already stored"));
        }
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| sink_error(internal_name, "jar already finished"))?;
        let written = writer
            .start_file(format!("{internal_name}.class"), entry_options())
            .map_err(|e| e.to_string())
            .and_then(|_| writer.write_all(bytes).map_err(|e| e.to_string()));
        if let Err(reason) = written {
            self.writer = None;
            self.failure = Some(format!("{internal_name}: {reason}"));
            return Err(sink_error(internal_name, reason));
        }
        self.stored.insert(internal_name.to_string());
        Ok(())
    }

    /// Writes the central directory. Reports an earlier failed entry instead.
    fn finish(&mut self) -> Result<(), String> {
        if let Some(failure) = &self.failure {
            return Err(format!("jar incomplete, {failure}"));
        }
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };
        let mut inner = writer.finish().map_err(|e| e.to_string())?;
        inner.flush().map_err(|e| e.to_string())
    }
}

/// Packs classes into a jar. Entries are deflated and carry a fixed timestamp,
/// and a batch stores them in input order, so the same batch always produces
/// the same archive. Call [`JarClassSink::finish`] to write the central
/// directory and see any error doing so.
pub struct JarClassSink {
    jar_file_path: PathBuf,
    state: Mutex<JarState<BufWriter<File>>>,
}

impl JarClassSink {
    pub fn new(path: impl AsRef<Path>) -> GenResult<JarClassSink> {
        let jar_file_path = path.as_ref().to_path_buf();
        let display = jar_file_path.to_string_lossy().to_string();
        let file = File::create(&jar_file_path).map_err(|e| sink_error(&display, e))?;
        let state = JarState::new(BufWriter::new(file)).map_err(|e| sink_error(&display, e))?;
        Ok(JarClassSink {
            jar_file_path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.jar_file_path
    }

    pub fn finish(&self) -> GenResult<()> {
        self.state
            .lock()
            .finish()
            .map_err(|reason| sink_error(&self.jar_file_path.to_string_lossy(), reason))
    }
}

impl Debug for JarClassSink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "JarClassSink => {}", self.jar_file_path.display())
    }
}

impl ClassSink for JarClassSink {
    fn store(&self, internal_name: &str, blob: ClassBlob) -> GenResult<()> {
        self.state.lock().store(internal_name, blob.as_bytes())
    }
}
