#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use yadfs_core::{
    AllocatedFile, Confirmer, DatanodeAddress, DatanodeTransport, DirectoryListing,
    FileDescriptor, MasterApi, Orchestrator, PathKind, ReplicaPolicy, ReplicaSetExecutor, Result,
    YadfsError,
};

#[derive(Default)]
struct Namespace {
    dirs: BTreeSet<String>,
    files: BTreeMap<String, FileDescriptor>,
    next_id: u64,
}

/// In-memory master and datanodes sharing one call log.
pub struct MemoryCluster {
    namespace: Mutex<Namespace>,
    replicas: Vec<DatanodeAddress>,
    blobs: Mutex<HashMap<(String, String), Bytes>>,
    down: Mutex<HashSet<String>>,
    pub fail_allocate: Mutex<bool>,
    calls: Mutex<Vec<String>>,
}

impl MemoryCluster {
    pub fn new(replicas: &[&str]) -> Arc<Self> {
        let mut namespace = Namespace::default();
        namespace.dirs.insert("/".to_string());

        Arc::new(Self {
            namespace: Mutex::new(namespace),
            replicas: replicas.iter().map(|node| DatanodeAddress::new(*node)).collect(),
            blobs: Mutex::new(HashMap::new()),
            down: Mutex::new(HashSet::new()),
            fail_allocate: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn orchestrator(self: &Arc<Self>) -> Orchestrator {
        let executor = Arc::new(ReplicaSetExecutor::new(
            self.clone(),
            ReplicaPolicy::default(),
        ));
        Orchestrator::new(self.clone(), executor)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn take_down(&self, node: &str) {
        self.down.lock().unwrap().insert(node.to_string());
    }

    pub fn has_dir(&self, path: &str) -> bool {
        self.namespace.lock().unwrap().dirs.contains(path)
    }

    pub fn file(&self, path: &str) -> Option<FileDescriptor> {
        self.namespace.lock().unwrap().files.get(path).cloned()
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn mkdir_all(&self, path: &str) {
        let mut namespace = self.namespace.lock().unwrap();
        let mut current = String::new();
        for part in path.split('/').filter(|part| !part.is_empty()) {
            current.push('/');
            current.push_str(part);
            namespace.dirs.insert(current.clone());
        }
    }

    /// Register a path as both file and directory.
    pub fn insert_ambiguous(&self, path: &str) {
        self.mkdir_all(path);
        let mut namespace = self.namespace.lock().unwrap();
        namespace.files.insert(
            path.to_string(),
            FileDescriptor {
                file_id: "ambiguous".to_string(),
                path: path.to_string(),
                nodes: self.replicas.clone(),
            },
        );
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn parent_of(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(index) => path[..index].to_string(),
    }
}

fn name_of(path: &str) -> String {
    path.rsplit('/').next().unwrap_or_default().to_string()
}

fn master_error(operation: &'static str, path: &str, status: u16) -> YadfsError {
    YadfsError::Master {
        operation,
        path: path.to_string(),
        status,
        message: String::new(),
    }
}

#[async_trait]
impl MasterApi for MemoryCluster {
    async fn status(&self) -> Result<serde_json::Value> {
        self.record("status".to_string());
        Ok(serde_json::json!({ "status": "ok", "datanodes": self.replicas.len() }))
    }

    async fn resolve_file(&self, path: &str) -> Result<Option<FileDescriptor>> {
        self.record(format!("resolve_file {}", path));
        Ok(self.namespace.lock().unwrap().files.get(path).cloned())
    }

    async fn resolve_directory(&self, path: &str) -> Result<Option<DirectoryListing>> {
        self.record(format!("resolve_directory {}", path));
        let namespace = self.namespace.lock().unwrap();
        if !namespace.dirs.contains(path) {
            return Ok(None);
        }

        let dirs = namespace
            .dirs
            .iter()
            .filter(|dir| dir.as_str() != "/" && parent_of(dir) == path)
            .map(|dir| name_of(dir))
            .collect();
        let files = namespace
            .files
            .keys()
            .filter(|file| parent_of(file) == path)
            .map(|file| name_of(file))
            .collect();

        Ok(Some(DirectoryListing { dirs, files }))
    }

    async fn allocate_file(&self, path: &str) -> Result<AllocatedFile> {
        self.record(format!("allocate_file {}", path));
        if *self.fail_allocate.lock().unwrap() {
            return Err(master_error("allocate file", path, 503));
        }

        let mut namespace = self.namespace.lock().unwrap();
        if !namespace.dirs.contains(&parent_of(path)) {
            return Err(master_error("allocate file", path, 400));
        }

        namespace.next_id += 1;
        let file = FileDescriptor {
            file_id: format!("f{}", namespace.next_id),
            path: path.to_string(),
            nodes: self.replicas.clone(),
        };
        namespace.files.insert(path.to_string(), file.clone());

        Ok(AllocatedFile {
            file,
            datanodes: self.replicas.clone(),
        })
    }

    async fn create_directory(&self, path: &str) -> Result<()> {
        self.record(format!("create_directory {}", path));
        let mut namespace = self.namespace.lock().unwrap();
        if namespace.dirs.contains(path) || !namespace.dirs.contains(&parent_of(path)) {
            return Err(master_error("create directory", path, 400));
        }
        namespace.dirs.insert(path.to_string());
        Ok(())
    }

    async fn delete_path(&self, path: &str, kind: PathKind) -> Result<()> {
        self.record(format!("delete_{} {}", kind.as_str(), path));
        let mut namespace = self.namespace.lock().unwrap();
        match kind {
            PathKind::File => {
                if namespace.files.remove(path).is_none() {
                    return Err(master_error("delete file", path, 404));
                }
            }
            PathKind::Directory => {
                if !namespace.dirs.remove(path) {
                    return Err(master_error("delete directory", path, 404));
                }
                let prefix = format!("{}/", path);
                namespace.dirs.retain(|dir| !dir.starts_with(&prefix));
                namespace.files.retain(|file, _| !file.starts_with(&prefix));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DatanodeTransport for MemoryCluster {
    async fn fetch(&self, node: &DatanodeAddress, file_id: &str) -> Result<Bytes> {
        self.record(format!("fetch {} {}", node, file_id));
        if self.down.lock().unwrap().contains(node.as_str()) {
            return Err(YadfsError::Http(format!("{} unreachable", node)));
        }
        self.blobs
            .lock()
            .unwrap()
            .get(&(node.to_string(), file_id.to_string()))
            .cloned()
            .ok_or_else(|| YadfsError::Http(format!("{} has no {}", node, file_id)))
    }

    async fn store(&self, node: &DatanodeAddress, file_id: &str, body: Bytes) -> Result<()> {
        self.record(format!("store {} {}", node, file_id));
        if self.down.lock().unwrap().contains(node.as_str()) {
            return Err(YadfsError::Http(format!("{} unreachable", node)));
        }
        self.blobs
            .lock()
            .unwrap()
            .insert((node.to_string(), file_id.to_string()), body);
        Ok(())
    }
}

/// Confirmer fed from a fixed list of answers.
pub struct ScriptedConfirmer {
    answers: VecDeque<String>,
    pub prompts: usize,
    pub rejected: Vec<String>,
}

impl ScriptedConfirmer {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|answer| answer.to_string()).collect(),
            prompts: 0,
            rejected: Vec::new(),
        }
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn ask(&mut self, _prompt: &str) -> Result<Option<String>> {
        self.prompts += 1;
        Ok(self.answers.pop_front())
    }

    fn reject(&mut self, answer: &str) {
        self.rejected.push(answer.to_string());
    }
}
