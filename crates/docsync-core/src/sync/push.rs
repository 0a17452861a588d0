use docsync_git::probe_repository;
use docsync_meta::{PathContext, Reference, Settings, Target};

use super::{NodeReport, PushOptions, PushReport, SyncContext, build_upload_plan};
use crate::transport::{TransportKind, Transports};
use crate::validate::{IssueKind, validate_tree};
use crate::{Error, Result, assets};

/// Push the document tree of `ctx.dir`: template, slot, then root.
///
/// Local configuration and consistency problems are reported before any
/// request is sent.
pub async fn push(ctx: &SyncContext, options: &PushOptions) -> Result<PushReport> {
    let mut nodes = push_nodes(ctx)?;
    let kinds = nodes
        .iter()
        .map(|node| effective_kind(options, node))
        .collect::<Result<Vec<_>>>()?;

    let archive_nodes: Vec<&PathContext> = nodes
        .iter()
        .zip(&kinds)
        .filter(|(_, kind)| **kind == TransportKind::Archive)
        .map(|(node, _)| node)
        .collect();
    if !archive_nodes.is_empty() {
        let plans = build_upload_plan(&ctx.client, &archive_nodes)
            .await
            .map_err(Error::push_failed)?;
        if !ctx.confirm.confirm(&plans)? {
            return Err(Error::Aborted);
        }
    }

    let transports = Transports::new(ctx.client.clone(), false);
    let mut reports = Vec::with_capacity(nodes.len());
    for (node, kind) in nodes.iter_mut().zip(&kinds) {
        tracing::info!(
            reference = %node.reference,
            path = %node.normalized_path,
            dir = %node.absolute_dir.display(),
            transport = %kind,
            "Pushing"
        );
        let outcome = transports
            .get(*kind)
            .push(node)
            .await
            .map_err(Error::push_failed)?;
        if let Some(server_path) = &outcome.server_path {
            adopt_server_path(node, server_path).map_err(Error::push_failed)?;
        }
        reports.push(NodeReport {
            reference: node.reference,
            path: node.normalized_path.clone(),
            transport: outcome.transport,
            changed: outcome.changed,
            skipped: outcome.skipped,
            assets: Default::default(),
        });
    }

    for (node, report) in nodes.iter().zip(reports.iter_mut()) {
        let mut assets = assets::upload(&ctx.client, node)
            .await
            .map_err(Error::push_failed)?;
        assets.merge(
            assets::delete(&ctx.client, node)
                .await
                .map_err(Error::push_failed)?,
        );
        report.assets = assets;
    }

    let root_path = nodes
        .last()
        .map(|root| root.normalized_path.clone())
        .unwrap_or_else(|| ctx.target.path.clone());
    let target = Target {
        path: root_path,
        ..ctx.target.clone()
    };
    ctx.populator.populate(&target, Some(&ctx.dir)).await?;

    Ok(PushReport {
        nodes: reports,
        url: target.document_url(),
    })
}

/// Template and slot nodes that exist locally, then the root.
fn push_nodes(ctx: &SyncContext) -> Result<Vec<PathContext>> {
    let settings = Settings::load(&ctx.dir)?;
    for child in Reference::CHILDREN {
        let child_dir = ctx.dir.join(child.dir_name());
        if child_dir.is_dir() && settings.pointer(child).is_none() {
            return Err(Error::UndeclaredSubdocument {
                dir: child_dir,
                key: child.pointer_key().to_string(),
            });
        }
    }

    if let Some(issue) = validate_tree(&ctx.dir)?
        .into_iter()
        .find(|issue| issue.kind == IssueKind::Consistency)
    {
        return Err(Error::PathCollision {
            dir: issue.dir,
            message: issue.message,
        });
    }

    let root = ctx.root_node()?;
    let mut nodes = Vec::new();
    for node in root.children()? {
        if !node.dir.is_dir() {
            continue;
        }
        if let Some(own) = node.settings.as_ref().and_then(|s| s.path.as_deref()) {
            let own = docsync_meta::normalize_document_path(own);
            if own != node.normalized_path {
                return Err(Error::PathMismatch {
                    dir: node.dir.clone(),
                    expected: node.normalized_path.clone(),
                    actual: own,
                });
            }
        }
        nodes.push(node);
    }
    nodes.push(root);
    Ok(nodes)
}

/// Git pushes of directories without a remote run as archive pushes; plan
/// them as such.
fn effective_kind(options: &PushOptions, node: &PathContext) -> Result<TransportKind> {
    let kind = options.transport.resolve(&node.dir)?;
    if kind == TransportKind::Git && !probe_repository(&node.dir).has_remote() {
        return Ok(TransportKind::Archive);
    }
    Ok(kind)
}

/// Record a server-assigned path in the node's settings and in the pointer
/// its parent holds.
fn adopt_server_path(node: &mut PathContext, server_path: &str) -> Result<()> {
    let mut settings = Settings::load(&node.dir)?;
    settings.path = Some(server_path.to_string());
    settings.save(&node.dir)?;

    if node.reference != Reference::Root {
        if let Some(parent) = node.dir.parent() {
            let mut parent_settings = Settings::load(parent)?;
            parent_settings.set_pointer(node.reference, Some(server_path.to_string()));
            parent_settings.save(parent)?;
        }
    }

    tracing::info!(
        old = %node.normalized_path,
        new = %server_path,
        "Server assigned a new path"
    );
    node.set_path(server_path);
    node.reload_settings()?;
    Ok(())
}
