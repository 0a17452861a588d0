use docsync_meta::{PathContext, Settings};

use super::{NodeReport, PullOptions, PullReport, SyncContext};
use crate::transport::Transports;
use crate::{Error, Result, assets};

/// Pull the document tree into `ctx.dir`: root first, then the template and
/// slot its settings name, one after another.
pub async fn pull(ctx: &SyncContext, options: &PullOptions) -> Result<PullReport> {
    let transports = Transports::new(ctx.client.clone(), options.track);

    let mut root = ctx.root_node()?;
    let root_report = pull_node(&transports, options, &mut root).await?;
    if root.settings.is_none() {
        return Err(Error::pull_failed(
            docsync_meta::Error::SettingsNotFound {
                path: Settings::file(&root.dir),
            }
            .into(),
        ));
    }

    let children = root.children()?;
    let mut nodes = vec![(root, root_report)];
    for mut node in children {
        if node.collides() {
            return Err(Error::pull_failed(Error::PathCollision {
                dir: node.dir.clone(),
                message: format!(
                    "{} {} is already used in this document tree",
                    node.reference.pointer_key(),
                    node.normalized_path
                ),
            }));
        }
        let report = pull_node(&transports, options, &mut node).await?;
        nodes.push((node, report));
    }

    for (node, report) in nodes.iter_mut() {
        report.assets = assets::download(&ctx.client, node)
            .await
            .map_err(Error::pull_failed)?;
    }

    ctx.populator.populate(&ctx.target, Some(&ctx.dir)).await?;

    Ok(PullReport {
        nodes: nodes.into_iter().map(|(_, report)| report).collect(),
        url: ctx.target.document_url(),
    })
}

async fn pull_node(
    transports: &Transports,
    options: &PullOptions,
    node: &mut PathContext,
) -> Result<NodeReport> {
    let kind = options.transport.resolve(&node.dir)?;
    tracing::info!(
        reference = %node.reference,
        path = %node.normalized_path,
        dir = %node.absolute_dir.display(),
        transport = %kind,
        "Pulling"
    );

    let outcome = transports
        .get(kind)
        .pull(node)
        .await
        .map_err(Error::pull_failed)?;
    node.reload_settings()?;

    Ok(NodeReport {
        reference: node.reference,
        path: node.normalized_path.clone(),
        transport: outcome.transport,
        changed: outcome.changed,
        skipped: outcome.skipped,
        assets: Default::default(),
    })
}
