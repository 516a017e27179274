//! Live status output while an attempt runs.

use std::io::{self, Write};

use crate::form::{Submission, SubmissionStatus};
use crate::session::Session;
use crate::view::render::banners;

/// Run `submission`, writing the banners for each status it publishes.
///
/// A status is written once even if it is observed more than once. The
/// terminal status is always written, including when it is published too late
/// for the update loop to see it.
pub async fn follow<W: Write>(
    submission: Submission,
    session: &Session,
    out: &mut W,
) -> io::Result<SubmissionStatus> {
    let mut updates = submission.status_handle().subscribe();
    let mut shown = updates.borrow().clone();

    let run = submission.run();
    tokio::pin!(run);

    let final_status = loop {
        tokio::select! {
            status = &mut run => break status,
            Ok(()) = updates.changed() => {
                let status = updates.borrow_and_update().clone();
                if status != shown {
                    write_banners(&status, session, out)?;
                    shown = status;
                }
            }
        }
    };

    if final_status != shown {
        write_banners(&final_status, session, out)?;
    }
    Ok(final_status)
}

fn write_banners<W: Write>(
    status: &SubmissionStatus,
    session: &Session,
    out: &mut W,
) -> io::Result<()> {
    for banner in banners(status, session) {
        writeln!(out, "{}", banner.render(session.network()))?;
    }
    out.flush()
}
