mod assemble;
mod error;
mod fonts;
mod model;
mod options;
mod pdf;
mod sheet;
mod store;

pub use assemble::{build_document, render_document};
pub use error::Error;
pub use fonts::StandardFont;
pub use model::{
    Candidate, CandidateId, DATE_FORMAT, Formation, HOURS_PER_DAY, Period, PeriodId, Selection,
    Session, SessionId, Site,
};
pub use options::{LayoutOptions, LogoAlignment, PageSize};
pub use pdf::{Canvas, Logo};
pub use sheet::{
    AttendanceDocument, Block, Column, Grid, GridBlock, GridRow, LayoutPolicy, LogoBlock, Page,
    CERTIFICATION, STAMP_CAPTION, SheetBuilder, StampBlock, TITLE, TextBlock, build_grid,
    inter_block_spacing, row_height,
};
pub use store::{Repository, RosterStore};

use std::path::Path;

pub const ATTACHMENT_FILENAME: &str = "feuille_emargement.pdf";
pub const ATTACHMENT_MIME: &str = "application/pdf";

/// A finished attendance document, ready to hand to an HTTP layer or write to disk.
#[derive(Clone, Debug)]
pub struct Attachment {
    pub bytes: Vec<u8>,
    pub filename: &'static str,
    pub mime_type: &'static str,
}

/// Resolve the selections against `repo` and render the sheets. Unknown ids
/// fail before anything is drawn.
pub fn generate_attendance_document(
    repo: &impl Repository,
    session_id: SessionId,
    periods: &Selection,
    candidates: &Selection,
    options: &LayoutOptions,
) -> Result<Attachment, Error> {
    let session = repo.session(session_id)?;
    let periods = repo.periods(session_id, periods)?;
    let candidates = repo.candidates(session_id, candidates)?;
    log::debug!(
        "Generating {} periods x {} candidates for {}",
        periods.len(),
        candidates.len(),
        session.display_name()
    );
    let bytes = render_document(&session, &candidates, &periods, options)?;
    Ok(Attachment {
        bytes,
        filename: ATTACHMENT_FILENAME,
        mime_type: ATTACHMENT_MIME,
    })
}

pub fn generate_attendance_file(
    repo: &impl Repository,
    session_id: SessionId,
    periods: &Selection,
    candidates: &Selection,
    options: &LayoutOptions,
    output: &Path,
) -> Result<(), Error> {
    let attachment = generate_attendance_document(repo, session_id, periods, candidates, options)?;
    std::fs::write(output, &attachment.bytes).map_err(Error::Io)?;
    log::info!("Wrote {} ({} bytes)", output.display(), attachment.bytes.len());
    Ok(())
}
