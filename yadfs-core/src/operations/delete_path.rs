use crate::confirm::{Confirmer, confirm};
use crate::session::{SessionContext, is_ancestor_or_self};
use crate::{DirectoryListing, MasterApi, PathKind, Result};
use std::sync::Arc;

/// What the delete procedure does once the target has been classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAction {
    DeleteFile,
    DeleteDirectory,
    AskConfirmation,
    NoSuchPath,
}

/// A file wins over a directory when the master reports both.
pub fn classify(file_found: bool, directory: Option<&DirectoryListing>) -> DeleteAction {
    if file_found {
        return DeleteAction::DeleteFile;
    }

    match directory {
        Some(listing) if listing.is_empty() => DeleteAction::DeleteDirectory,
        Some(_) => DeleteAction::AskConfirmation,
        None => DeleteAction::NoSuchPath,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletePathOperationOutcome {
    GuardRejected,
    DeletedFile,
    DeletedDirectory,
    Declined,
    NotFound,
}

#[derive(Clone)]
pub struct DeletePathOperation {
    master: Arc<dyn MasterApi>,
}

impl DeletePathOperation {
    pub fn new(master: Arc<dyn MasterApi>) -> Self {
        Self { master }
    }

    /// `target` may be relative; it is resolved against the session first.
    pub async fn run(
        &self,
        session: &SessionContext,
        target: &str,
        confirmer: &mut dyn Confirmer,
    ) -> Result<DeletePathOperationOutcome> {
        let target = session.resolve(target);
        let target = target.as_str();

        if is_ancestor_or_self(target, session.working_dir()) {
            tracing::debug!(
                "Delete rejected: target={} working_dir={}",
                target,
                session.working_dir()
            );
            return Ok(DeletePathOperationOutcome::GuardRejected);
        }

        let (file, directory) = tokio::try_join!(
            self.master.resolve_file(target),
            self.master.resolve_directory(target)
        )?;

        match classify(file.is_some(), directory.as_ref()) {
            DeleteAction::DeleteFile => {
                self.master.delete_path(target, PathKind::File).await?;
                tracing::info!("Deleted file: path={}", target);
                Ok(DeletePathOperationOutcome::DeletedFile)
            }
            DeleteAction::DeleteDirectory => {
                self.master.delete_path(target, PathKind::Directory).await?;
                tracing::info!("Deleted empty directory: path={}", target);
                Ok(DeletePathOperationOutcome::DeletedDirectory)
            }
            DeleteAction::AskConfirmation => {
                let prompt = format!(
                    "delete: directory '{}' is not empty, remove? [y/N]: ",
                    target
                );
                if !confirm(confirmer, &prompt).await? {
                    return Ok(DeletePathOperationOutcome::Declined);
                }

                self.master.delete_path(target, PathKind::Directory).await?;
                tracing::info!("Deleted non-empty directory: path={}", target);
                Ok(DeletePathOperationOutcome::DeletedDirectory)
            }
            DeleteAction::NoSuchPath => Ok(DeletePathOperationOutcome::NotFound),
        }
    }
}
