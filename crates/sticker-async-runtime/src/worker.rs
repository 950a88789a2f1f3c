use std::sync::Arc;

use sticker_layout::{
    CancelToken, ImageSource, RasterJob, Session, Sheet, SheetOptions, StickerError,
    calculate_statistics, create_session, plan_layouts, preview_job, probe_dimensions,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::store::SessionStore;
use crate::{SessionId, SheetCommand, SheetUpdate, WorkerError};

/// What a finished raster job is reported as
enum RasterKind {
    Print(Sheet),
    Preview,
}

/// Async worker task that owns every open session and applies commands in order
///
/// Mutations are applied one at a time, so each session sees a single
/// logical actor. Rasterization runs on spawned tasks against a snapshot of
/// the session and can be cancelled by later commands.
pub async fn worker_task<S: ImageSource>(
    source: Arc<S>,
    mut command_rx: mpsc::UnboundedReceiver<SheetCommand>,
    update_tx: mpsc::UnboundedSender<SheetUpdate>,
) {
    let mut store = SessionStore::new();

    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut store, &source, &mut command_rx, &update_tx).await;
    }
    log::debug!("Command channel closed; worker exiting");
}

async fn process_command<S: ImageSource>(
    cmd: SheetCommand,
    store: &mut SessionStore,
    source: &Arc<S>,
    command_rx: &mut mpsc::UnboundedReceiver<SheetCommand>,
    update_tx: &mpsc::UnboundedSender<SheetUpdate>,
) {
    let session_id = command_session(&cmd);
    let result = match cmd {
        SheetCommand::Open {
            options,
            aspect_ratio,
            desired_count,
        } => handle_open(store, options, aspect_ratio, desired_count, update_tx),
        SheetCommand::AddSticker {
            session_id,
            source: reference,
        } => {
            let known = store.get(session_id).map(|_| ());
            match known {
                Ok(()) => {
                    // Header reads can block, so they run off the worker
                    let dimensions = probe_dimensions(source, &reference).await;
                    store.get_mut(session_id).and_then(|session| {
                        let id = session.add_sticker(reference, dimensions)?;
                        let _ = update_tx.send(SheetUpdate::StickerAdded { session_id, id });
                        send_changed(session_id, session, update_tx);
                        Ok(())
                    })
                }
                Err(e) => Err(e),
            }
        }
        SheetCommand::RemoveSticker { session_id, id } => {
            store.get_mut(session_id).and_then(|session| {
                session.remove_sticker(id)?;
                send_changed(session_id, session, update_tx);
                Ok(())
            })
        }
        SheetCommand::RotateSticker { session_id, id } => {
            store.get_mut(session_id).and_then(|session| {
                session.rotate_sticker(id)?;
                send_changed(session_id, session, update_tx);
                Ok(())
            })
        }
        SheetCommand::PreviewDrag {
            session_id,
            mut id,
            mut start,
            mut delta,
        } => {
            // Drain any queued drag previews for this session, keeping only the most recent
            while let Ok(next_cmd) = command_rx.try_recv() {
                match next_cmd {
                    SheetCommand::PreviewDrag {
                        session_id: next_session,
                        id: next_id,
                        start: next_start,
                        delta: next_delta,
                    } if next_session == session_id => {
                        log::debug!("Discarding queued drag preview, using newer request");
                        id = next_id;
                        start = next_start;
                        delta = next_delta;
                    }
                    other => {
                        // Can't put it back, so process it now before the preview
                        Box::pin(process_command(other, store, source, command_rx, update_tx))
                            .await;
                    }
                }
            }

            store.get(session_id).and_then(|session| {
                let resolution = session.preview_drag(id, start, delta)?;
                let _ = update_tx.send(SheetUpdate::DragPreview {
                    session_id,
                    id,
                    resolution,
                });
                Ok(())
            })
        }
        SheetCommand::Relocate { session_id, id, x, y } => {
            store.get_mut(session_id).and_then(|session| {
                session.relocate_sticker(id, x, y)?;
                send_changed(session_id, session, update_tx);
                Ok(())
            })
        }
        SheetCommand::AutoArrange { session_id } => store.get_mut(session_id).map(|session| {
            session.auto_arrange();
            send_changed(session_id, session, update_tx);
        }),
        SheetCommand::Clear { session_id } => {
            store.cancel_raster(session_id);
            store.get_mut(session_id).map(|session| {
                session.clear();
                send_changed(session_id, session, update_tx);
            })
        }
        SheetCommand::CalculateStats { session_id } => store.get(session_id).map(|session| {
            let _ = update_tx.send(SheetUpdate::StatsCalculated {
                session_id,
                stats: calculate_statistics(session),
            });
        }),
        SheetCommand::Rasterize { session_id } => {
            let prepared = store.get(session_id).and_then(|session| {
                Ok((RasterJob::from_session(session, false)?, session.sheet()))
            });
            prepared.map(|(job, sheet)| {
                let cancel = CancelToken::new();
                let handle = spawn_raster(
                    session_id,
                    job,
                    RasterKind::Print(sheet),
                    Arc::clone(source),
                    cancel.clone(),
                    update_tx.clone(),
                );
                store.track_raster(session_id, cancel, handle);
            })
        }
        SheetCommand::RenderPreview {
            session_id,
            max_edge_px,
        } => {
            let prepared = store
                .get(session_id)
                .and_then(|session| Ok(preview_job(session, max_edge_px)?));
            prepared.map(|job| {
                let cancel = CancelToken::new();
                let handle = spawn_raster(
                    session_id,
                    job,
                    RasterKind::Preview,
                    Arc::clone(source),
                    cancel.clone(),
                    update_tx.clone(),
                );
                store.track_raster(session_id, cancel, handle);
            })
        }
        SheetCommand::CancelRaster { session_id } => {
            let known = store.get(session_id).map(|_| ());
            known.map(|()| {
                if !store.cancel_raster(session_id) {
                    log::debug!("No raster in flight for {session_id}");
                }
            })
        }
        SheetCommand::Close { session_id } => store.remove(session_id).map(|_| {
            log::debug!("Closed {session_id}");
            let _ = update_tx.send(SheetUpdate::Closed { session_id });
        }),
    };

    if let Err(e) = result {
        log::warn!("Command failed: {e}");
        let _ = update_tx.send(SheetUpdate::Error {
            session_id,
            message: e.to_string(),
        });
    }
}

fn command_session(cmd: &SheetCommand) -> Option<SessionId> {
    match cmd {
        SheetCommand::Open { .. } => None,
        SheetCommand::AddSticker { session_id, .. }
        | SheetCommand::RemoveSticker { session_id, .. }
        | SheetCommand::RotateSticker { session_id, .. }
        | SheetCommand::PreviewDrag { session_id, .. }
        | SheetCommand::Relocate { session_id, .. }
        | SheetCommand::AutoArrange { session_id }
        | SheetCommand::Clear { session_id }
        | SheetCommand::CalculateStats { session_id }
        | SheetCommand::Rasterize { session_id }
        | SheetCommand::RenderPreview { session_id, .. }
        | SheetCommand::CancelRaster { session_id }
        | SheetCommand::Close { session_id } => Some(*session_id),
    }
}

fn handle_open(
    store: &mut SessionStore,
    options: SheetOptions,
    aspect_ratio: f32,
    desired_count: Option<usize>,
    update_tx: &mpsc::UnboundedSender<SheetUpdate>,
) -> Result<(), WorkerError> {
    options.validate()?;
    let plan = plan_layouts(&options.sheet(), aspect_ratio, desired_count)?;
    let session = create_session(&options, plan.recommended.clone())?;
    let max_stickers = session.max_stickers();
    let session_id = store.insert(session);

    log::debug!("Opened {session_id}: {}", plan.recommended.label);
    let _ = update_tx.send(SheetUpdate::Opened {
        session_id,
        plan,
        max_stickers,
    });
    Ok(())
}

fn send_changed(
    session_id: SessionId,
    session: &Session,
    update_tx: &mpsc::UnboundedSender<SheetUpdate>,
) {
    let _ = update_tx.send(SheetUpdate::SheetChanged {
        session_id,
        placements: session.placements().to_vec(),
        validation: session.validation().clone(),
    });
}

fn spawn_raster<S: ImageSource>(
    session_id: SessionId,
    job: RasterJob,
    kind: RasterKind,
    source: Arc<S>,
    cancel: CancelToken,
    update_tx: mpsc::UnboundedSender<SheetUpdate>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let update = match job.run(source, &cancel).await {
            Ok(output) => match kind {
                RasterKind::Print(sheet) => SheetUpdate::Rasterized {
                    session_id,
                    summary: output.order_summary(&sheet),
                    output,
                },
                RasterKind::Preview => SheetUpdate::PreviewRendered { session_id, output },
            },
            Err(StickerError::Cancelled) => {
                log::debug!("Raster for {session_id} cancelled");
                SheetUpdate::RasterCancelled { session_id }
            }
            Err(e) => {
                log::warn!("Raster for {session_id} failed: {e}");
                SheetUpdate::Error {
                    session_id: Some(session_id),
                    message: e.to_string(),
                }
            }
        };
        let _ = update_tx.send(update);
    })
}
