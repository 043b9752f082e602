use std::time::Instant;

use crate::error::Error;
use crate::model::{Candidate, Period, Session, check_range};
use crate::options::LayoutOptions;
use crate::pdf::{Canvas, Logo};
use crate::sheet::{AttendanceDocument, SheetBuilder};

/// Reject anything that would make the render loop fail half-way through a
/// selection: empty selections, foreign records and reversed periods.
fn validate(session: &Session, candidates: &[Candidate], periods: &[Period]) -> Result<(), Error> {
    if periods.is_empty() {
        return Err(Error::InvalidSelection(format!(
            "session {} has no period to print",
            session.id
        )));
    }
    if candidates.is_empty() {
        return Err(Error::InvalidSelection(format!(
            "session {} has no candidate to print",
            session.id
        )));
    }
    if let Some(p) = periods.iter().find(|p| p.session_id != session.id) {
        return Err(Error::InvalidSelection(format!(
            "period {} belongs to session {}, not {}",
            p.id, p.session_id, session.id
        )));
    }
    if let Some(c) = candidates.iter().find(|c| c.session_id != session.id) {
        return Err(Error::InvalidSelection(format!(
            "candidate {} belongs to session {}, not {}",
            c.id, c.session_id, session.id
        )));
    }
    for p in periods {
        check_range(p.start, p.end)?;
    }
    Ok(())
}

/// Load the configured logo. Any failure is logged and the sheets are
/// produced without it.
fn load_logo(options: &LayoutOptions) -> Option<Logo> {
    if !options.include_logo {
        return None;
    }
    let result = match &options.logo_path {
        Some(path) => Logo::load(path),
        None => Err(Error::MissingAsset("logo enabled but no logo path set".into())),
    };
    match result {
        Ok(logo) => Some(logo),
        Err(e) => {
            log::warn!("{e}; continuing without logo");
            None
        }
    }
}

fn lay_out(
    builder: &SheetBuilder<'_>,
    session: &Session,
    candidates: &[Candidate],
    periods: &[Period],
) -> Result<AttendanceDocument, Error> {
    let total = periods.len() * candidates.len();
    let mut pages = Vec::with_capacity(total);
    for period in periods {
        for candidate in candidates {
            let mut page = builder.build_page(session, candidate, period)?;
            builder.number_page(&mut page, pages.len() + 1, total);
            pages.push(page);
        }
    }
    let (page_width, page_height) = builder.page_size();
    Ok(AttendanceDocument {
        page_width,
        page_height,
        pages,
    })
}

/// Lay out one sheet per (period, candidate) pair, periods outermost, without
/// drawing anything.
pub fn build_document(
    session: &Session,
    candidates: &[Candidate],
    periods: &[Period],
    options: &LayoutOptions,
) -> Result<AttendanceDocument, Error> {
    validate(session, candidates, periods)?;
    let builder = SheetBuilder::new(options);
    lay_out(&builder, session, candidates, periods)
}

/// Produce the finished PDF for the cross product of `periods` and
/// `candidates`. Either every sheet is rendered or an error is returned.
pub fn render_document(
    session: &Session,
    candidates: &[Candidate],
    periods: &[Period],
    options: &LayoutOptions,
) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();

    validate(session, candidates, periods)?;
    if session.cancelled {
        log::warn!("Session {} is cancelled; printing sheets anyway", session.display_name());
    }
    let t_validate = t0.elapsed();

    let logo = load_logo(options);
    let mut builder = SheetBuilder::new(options);
    if let Some(logo) = &logo {
        let (w, h) = logo.pixel_size();
        builder = builder.with_logo(w, h);
    }
    let document = lay_out(&builder, session, candidates, periods)?;
    let t_layout = t0.elapsed();

    let mut canvas = Canvas::new(document.page_width, document.page_height);
    if let Some(logo) = logo {
        canvas.set_logo(logo);
    }
    for page in &document.pages {
        canvas.render_page(page).map_err(|e| match e {
            Error::RenderingFailed(_) => e,
            other => Error::RenderingFailed(other.to_string()),
        })?;
    }
    let t_render = t0.elapsed();

    let bytes = canvas.finish()?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: validate={:.1}ms, layout={:.1}ms, render={:.1}ms, assemble={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_validate.as_secs_f64() * 1000.0,
        (t_layout - t_validate).as_secs_f64() * 1000.0,
        (t_render - t_layout).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        document.pages.len(),
        bytes.len(),
    );

    Ok(bytes)
}
