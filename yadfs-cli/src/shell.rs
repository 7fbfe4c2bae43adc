use crate::command::{Command, HELP};
use crate::local_fs::{basename, read_local, write_local};
use crate::terminal::Terminal;
use std::io::{ErrorKind, Write};
use tokio::io::AsyncBufRead;
use yadfs_core::{
    ChangeDirOperationOutcome, Confirmer, CopyFileOperationOutcome, CopyFileOperationRequest,
    DeletePathOperationOutcome, ListPathOperationOutcome, Orchestrator, Result,
    RetrieveFileOperationOutcome, SessionContext, StoreFileOperationRequest, YadfsError,
    join_path,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Dispatches parsed commands against the orchestrator and owns the session.
pub struct Shell<W> {
    orchestrator: Orchestrator,
    session: SessionContext,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(orchestrator: Orchestrator, out: W) -> Self {
        Self {
            orchestrator,
            session: SessionContext::new(),
            out,
        }
    }

    pub fn prompt(&self) -> String {
        format!("{}@", self.session.working_dir())
    }

    pub fn print_help(&mut self) -> Result<()> {
        writeln!(self.out, "{}", HELP)?;
        Ok(())
    }

    /// Reads and runs lines until `exit` or end of input.
    pub async fn run<R: AsyncBufRead + Unpin + Send>(
        &mut self,
        terminal: &mut Terminal<R>,
    ) -> Result<()> {
        loop {
            let line = match terminal.read_line(&self.prompt()).await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    writeln!(self.out)?;
                    return Ok(());
                }
                Err(YadfsError::Io(error)) if error.kind() == ErrorKind::InvalidData => {
                    tracing::warn!("Skipping unreadable input line: {}", error);
                    writeln!(self.out, "Input is not valid UTF-8, please try again")?;
                    continue;
                }
                Err(error) => return Err(error),
            };

            if self.run_line(&line, terminal).await? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Runs one input line. Failures are reported and never end the session.
    pub async fn run_line(&mut self, line: &str, confirmer: &mut dyn Confirmer) -> Result<Flow> {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(error) => {
                writeln!(self.out, "{}", error)?;
                return Ok(Flow::Continue);
            }
        };

        if command == Command::Exit {
            return Ok(Flow::Exit);
        }

        if let Err(error) = self.dispatch(command, confirmer).await {
            tracing::error!(kind = ?error.kind(), "Command failed: {}", error);
            writeln!(self.out, "Command failed, please try again")?;
        }

        Ok(Flow::Continue)
    }

    async fn dispatch(&mut self, command: Command, confirmer: &mut dyn Confirmer) -> Result<()> {
        match command {
            Command::Status => {
                let status = self.orchestrator.status.run().await?;
                self.print_json(&status)?;
            }
            Command::Copy { source, target } => {
                let request = CopyFileOperationRequest {
                    source: self.session.resolve(&source),
                    destination: self.session.resolve(&target),
                };
                match self.orchestrator.copy_file.run(request).await? {
                    CopyFileOperationOutcome::Copied(result) => {
                        tracing::info!(
                            "Copied {} to {} ({} bytes)",
                            result.source.path,
                            result.destination.path,
                            result.size_bytes
                        );
                    }
                    CopyFileOperationOutcome::SourceNotFound => {
                        let source = self.session.resolve(&source);
                        writeln!(
                            self.out,
                            "copy: cannot stat '{}': No such file or directory",
                            source
                        )?;
                    }
                }
            }
            Command::Upload { local, destination } => {
                let body = read_local(&local).await?;
                let path = join_path(&self.session.resolve(&destination), &basename(&local)?);
                let stored = self
                    .orchestrator
                    .store_file
                    .run(StoreFileOperationRequest { path, body })
                    .await?;
                tracing::info!(
                    "Uploaded {} as {} ({} bytes, {}/{} replicas)",
                    local,
                    stored.file.path,
                    stored.size_bytes,
                    stored.receipt.acknowledged,
                    stored.datanodes.len()
                );
            }
            Command::Cd { destination } => {
                let outcome = self
                    .orchestrator
                    .change_dir
                    .run(&mut self.session, &destination)
                    .await?;
                if let ChangeDirOperationOutcome::NotFound(path) = outcome {
                    writeln!(self.out, "cd: {}: No such file or directory", path)?;
                }
            }
            Command::Mkdir { destination } => {
                let path = self.session.resolve(&destination);
                self.orchestrator.make_dir.run(&path).await?;
            }
            Command::Download {
                source,
                local_destination,
            } => self.download(&source, &local_destination).await?,
            Command::Delete { target } => {
                let target = self.session.resolve(&target);
                let outcome = self
                    .orchestrator
                    .delete_path
                    .run(&self.session, &target, confirmer)
                    .await?;
                match outcome {
                    DeletePathOperationOutcome::GuardRejected => writeln!(
                        self.out,
                        "delete: cannot remove '{}': It is a prefix of the current working directory",
                        target
                    )?,
                    DeletePathOperationOutcome::NotFound => writeln!(
                        self.out,
                        "delete: cannot remove '{}': No such file or directory",
                        target
                    )?,
                    DeletePathOperationOutcome::DeletedFile
                    | DeletePathOperationOutcome::DeletedDirectory
                    | DeletePathOperationOutcome::Declined => {}
                }
            }
            Command::List { destination } => {
                let path = self.session.resolve(destination.as_deref().unwrap_or("."));
                match self.orchestrator.list_path.run(&path).await? {
                    ListPathOperationOutcome::Directory(listing) => self.print_json(&listing)?,
                    ListPathOperationOutcome::File(file) => self.print_json(&file)?,
                    ListPathOperationOutcome::NotFound => writeln!(
                        self.out,
                        "list: cannot access '{}': No such file or directory",
                        path
                    )?,
                }
            }
            Command::Help => self.print_help()?,
            Command::Exit => {}
        }

        Ok(())
    }

    async fn download(&mut self, source: &str, local_destination: &str) -> Result<()> {
        let path = self.session.resolve(source);
        let result = match self.orchestrator.retrieve_file.run(&path).await? {
            RetrieveFileOperationOutcome::Found(result) => result,
            RetrieveFileOperationOutcome::NotFound => {
                writeln!(
                    self.out,
                    "download: cannot access '{}': No such file or directory",
                    path
                )?;
                return Ok(());
            }
        };

        writeln!(self.out, "File '{}' successfully retrieved", path)?;
        writeln!(self.out, "Saving to '{}'", local_destination)?;

        match write_local(local_destination, &result.body).await {
            Ok(()) => writeln!(self.out, "Successfully saved")?,
            Err(YadfsError::LocalIo { path, source }) => writeln!(
                self.out,
                "Error while saving on local filesystem: {} '{}'",
                source, path
            )?,
            Err(error) => return Err(error),
        }

        Ok(())
    }

    fn print_json<T: serde::Serialize>(&mut self, value: &T) -> Result<()> {
        writeln!(self.out, "{}", serde_json::to_string_pretty(value)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::{BTreeMap, BTreeSet, HashMap};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use yadfs_core::{
        AllocatedFile, DatanodeAddress, DatanodeTransport, DirectoryListing, FileDescriptor,
        MasterApi, PathKind, ReplicaPolicy, ReplicaSetExecutor, TransportOptions,
    };

    /// Master and a single datanode kept in memory.
    #[derive(Default)]
    struct MemoryStore {
        dirs: Mutex<BTreeSet<String>>,
        files: Mutex<BTreeMap<String, FileDescriptor>>,
        blobs: Mutex<HashMap<String, Bytes>>,
    }

    impl MemoryStore {
        fn shell() -> (Arc<Self>, Shell<Vec<u8>>) {
            let store = Arc::new(Self::default());
            store.dirs.lock().unwrap().insert("/".to_string());
            let executor = Arc::new(ReplicaSetExecutor::new(
                store.clone(),
                ReplicaPolicy::default(),
            ));
            let orchestrator = Orchestrator::new(store.clone(), executor);
            (store, Shell::new(orchestrator, Vec::new()))
        }
    }

    fn is_child(parent: &str, path: &str) -> Option<String> {
        let rest = if parent == "/" {
            path.strip_prefix('/')?
        } else {
            path.strip_prefix(parent)?.strip_prefix('/')?
        };
        (!rest.is_empty() && !rest.contains('/')).then(|| rest.to_string())
    }

    #[async_trait]
    impl MasterApi for MemoryStore {
        async fn status(&self) -> Result<serde_json::Value> {
            Ok(serde_json::json!({ "status": "ok" }))
        }

        async fn resolve_file(&self, path: &str) -> Result<Option<FileDescriptor>> {
            Ok(self.files.lock().unwrap().get(path).cloned())
        }

        async fn resolve_directory(&self, path: &str) -> Result<Option<DirectoryListing>> {
            let dirs = self.dirs.lock().unwrap();
            if !dirs.contains(path) {
                return Ok(None);
            }
            Ok(Some(DirectoryListing {
                dirs: dirs.iter().filter_map(|dir| is_child(path, dir)).collect(),
                files: self
                    .files
                    .lock()
                    .unwrap()
                    .keys()
                    .filter_map(|file| is_child(path, file))
                    .collect(),
            }))
        }

        async fn allocate_file(&self, path: &str) -> Result<AllocatedFile> {
            let mut files = self.files.lock().unwrap();
            let file = FileDescriptor {
                file_id: format!("f{}", files.len() + 1),
                path: path.to_string(),
                nodes: vec![DatanodeAddress::new("n1")],
            };
            files.insert(path.to_string(), file.clone());
            Ok(AllocatedFile {
                datanodes: file.nodes.clone(),
                file,
            })
        }

        async fn create_directory(&self, path: &str) -> Result<()> {
            self.dirs.lock().unwrap().insert(path.to_string());
            Ok(())
        }

        async fn delete_path(&self, path: &str, kind: PathKind) -> Result<()> {
            match kind {
                PathKind::File => self.files.lock().unwrap().remove(path).is_some(),
                PathKind::Directory => self.dirs.lock().unwrap().remove(path),
            };
            Ok(())
        }
    }

    #[async_trait]
    impl DatanodeTransport for MemoryStore {
        async fn fetch(&self, _node: &DatanodeAddress, file_id: &str) -> Result<Bytes> {
            self.blobs
                .lock()
                .unwrap()
                .get(file_id)
                .cloned()
                .ok_or_else(|| YadfsError::Http(format!("no blob {}", file_id)))
        }

        async fn store(&self, _node: &DatanodeAddress, file_id: &str, body: Bytes) -> Result<()> {
            self.blobs.lock().unwrap().insert(file_id.to_string(), body);
            Ok(())
        }
    }

    fn unreachable_shell() -> Shell<Vec<u8>> {
        let transport = TransportOptions {
            request_timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(1),
            system_proxy: false,
        };
        let orchestrator =
            Orchestrator::connect("http://127.0.0.1:9/", &transport, ReplicaPolicy::default())
                .unwrap();
        Shell::new(orchestrator, Vec::new())
    }

    fn output(shell: &Shell<Vec<u8>>) -> String {
        String::from_utf8(shell.out.clone()).unwrap()
    }

    #[tokio::test]
    async fn local_commands_need_no_master() {
        let mut shell = unreachable_shell();
        let mut terminal = Terminal::new(&b""[..]);

        assert_eq!(shell.prompt(), "/@");
        assert_eq!(shell.run_line("   ", &mut terminal).await.unwrap(), Flow::Continue);
        assert_eq!(shell.run_line("help", &mut terminal).await.unwrap(), Flow::Continue);
        assert_eq!(
            shell.run_line("frobnicate x", &mut terminal).await.unwrap(),
            Flow::Continue
        );
        assert_eq!(shell.run_line("exit", &mut terminal).await.unwrap(), Flow::Exit);

        let output = output(&shell);
        assert!(output.starts_with("Commands and arguments:"));
        assert!(output.contains("No such command 'frobnicate', please try again"));
    }

    #[tokio::test]
    async fn guard_rejection_is_reported_before_any_request() {
        let mut shell = unreachable_shell();
        let mut terminal = Terminal::new(&b""[..]);

        shell.run_line("delete /", &mut terminal).await.unwrap();
        assert_eq!(
            output(&shell),
            "delete: cannot remove '/': It is a prefix of the current working directory\n"
        );
    }

    #[tokio::test]
    async fn failed_commands_keep_the_session_alive() {
        let mut shell = unreachable_shell();
        let mut terminal = Terminal::new(&b""[..]);

        assert_eq!(shell.run_line("cd docs", &mut terminal).await.unwrap(), Flow::Continue);
        assert_eq!(shell.prompt(), "/@");
        assert!(output(&shell).contains("Command failed, please try again"));
    }

    #[tokio::test]
    async fn unreadable_upload_source_is_a_failed_command() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let mut shell = unreachable_shell();
        let mut terminal = Terminal::new(&b""[..]);

        let line = format!("upload {} /", missing.display());
        assert_eq!(shell.run_line(&line, &mut terminal).await.unwrap(), Flow::Continue);
        assert!(output(&shell).contains("Command failed, please try again"));
    }

    #[tokio::test]
    async fn upload_then_download_through_the_shell_keeps_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("report.txt");
        let saved = dir.path().join("saved.txt");
        std::fs::write(&local, b"\x00\x01yadfs\xff").unwrap();

        let (store, mut shell) = MemoryStore::shell();
        let mut terminal = Terminal::new(&b""[..]);

        for line in [
            "mkdir /docs".to_string(),
            "cd docs".to_string(),
            format!("upload {} .", local.display()),
            format!("download report.txt {}", saved.display()),
        ] {
            assert_eq!(shell.run_line(&line, &mut terminal).await.unwrap(), Flow::Continue);
        }

        assert!(store.files.lock().unwrap().contains_key("/docs/report.txt"));
        assert_eq!(std::fs::read(&saved).unwrap(), b"\x00\x01yadfs\xff");

        let output = output(&shell);
        assert!(output.contains("File '/docs/report.txt' successfully retrieved"));
        assert!(output.contains(&format!("Saving to '{}'", saved.display())));
        assert!(output.ends_with("Successfully saved\n"));
    }

    #[tokio::test]
    async fn download_into_missing_directory_reports_retrieved_but_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("a.bin");
        let target = dir.path().join("missing").join("a.bin");
        std::fs::write(&local, b"abc").unwrap();

        let (_store, mut shell) = MemoryStore::shell();
        let mut terminal = Terminal::new(&b""[..]);

        let upload = format!("upload {} /", local.display());
        shell.run_line(&upload, &mut terminal).await.unwrap();
        let download = format!("download /a.bin {}", target.display());
        assert_eq!(
            shell.run_line(&download, &mut terminal).await.unwrap(),
            Flow::Continue
        );

        let output = output(&shell);
        let retrieved = output.find("File '/a.bin' successfully retrieved").unwrap();
        let failed = output.find("Error while saving on local filesystem").unwrap();
        assert!(retrieved < failed);
        assert!(!output.contains("Successfully saved"));
        assert!(!output.contains("Command failed"));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn undecodable_input_line_is_skipped() {
        let (_store, mut shell) = MemoryStore::shell();
        let mut terminal = Terminal::new(&b"\xff\nstatus\nexit\nlist\n"[..]);

        shell.run(&mut terminal).await.unwrap();

        let output = output(&shell);
        assert!(output.starts_with("Input is not valid UTF-8, please try again\n"));
        assert!(output.contains("\"status\": \"ok\""));
        assert!(!output.contains("\"dirs\""));
    }

    #[tokio::test]
    async fn end_of_input_ends_the_loop() {
        let (_store, mut shell) = MemoryStore::shell();
        let mut terminal = Terminal::new(&b"mkdir /a\n"[..]);

        shell.run(&mut terminal).await.unwrap();
        assert_eq!(output(&shell), "\n");
    }
}
