pub mod change_dir;
pub mod copy_file;
pub mod delete_path;
pub mod list_path;
pub mod make_dir;
pub mod retrieve_file;
pub mod status;
pub mod store_file;

pub use change_dir::{ChangeDirOperation, ChangeDirOperationOutcome};
pub use copy_file::{
    CopyFileOperation, CopyFileOperationOutcome, CopyFileOperationRequest,
    CopyFileOperationResult,
};
pub use delete_path::{
    DeleteAction, DeletePathOperation, DeletePathOperationOutcome, classify,
};
pub use list_path::{ListPathOperation, ListPathOperationOutcome};
pub use make_dir::MakeDirOperation;
pub use retrieve_file::{
    RetrieveFileOperation, RetrieveFileOperationOutcome, RetrieveFileOperationResult,
};
pub use status::StatusOperation;
pub use store_file::{StoreFileOperation, StoreFileOperationRequest, StoreFileOperationResult};
