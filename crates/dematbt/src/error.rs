use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("No PDF selected")]
    NoPdfSelected,

    #[error("No extraction cached yet. Run `dematbt extract <pdf>` first.")]
    NothingCached,

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Document has no pages: {0}")]
    EmptyDocument(PathBuf),
}
