//! Asset loader for dialog graphs from "dialog.ron" files.

use bevy::{
    asset::{io::Reader, AssetLoader, AsyncReadExt, LoadContext},
    log::debug,
    utils::BoxedFuture,
};
use serde_ron::de::from_bytes;

use crate::prelude::{DialogGraph, DialogLoaderError};

use super::types::RonDialogCollection;

/// Load dialog graphs from ron assets.
#[derive(Default)]
pub struct DialogLoader;

impl AssetLoader for DialogLoader {
    type Asset = DialogGraph;
    type Settings = ();
    type Error = DialogLoaderError;

    fn load<'a>(
        &'a self,
        reader: &'a mut Reader,
        _settings: &'a Self::Settings,
        load_context: &'a mut LoadContext,
    ) -> BoxedFuture<'a, Result<Self::Asset, Self::Error>> {
        Box::pin(async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            let graph = parse_dialog_collection(&bytes)?;
            debug!(
                "loaded {} dialogs from {}",
                graph.len(),
                load_context.path().display()
            );
            Ok(graph)
        })
    }

    fn extensions(&self) -> &[&str] {
        &["dialog.ron"]
    }
}

/// Parses a dialog file and validates the resulting graph.
///
/// # Errors
///
/// Fails if the bytes are not a valid dialog file or the dialogs do not form
/// a valid [`DialogGraph`].
///
/// # Examples
///
/// ```
/// use bevy_conversations::prelude::*;
///
/// let ron = br#"(
///     roots: [0],
///     dialogs: [
///         (
///             id: 0,
///             text: (description: "greeting", strings: {En: "Hello"}),
///             options: [(text: (strings: {En: "Who are you?"}), next: Some(Dialog(1)))],
///         ),
///         (id: 1, options: [(next: Some(Redirect(0)))]),
///     ],
/// )"#;
///
/// let graph = parse_dialog_collection(ron).unwrap();
/// assert_eq!(graph.root_ids(), &[0]);
/// assert_eq!(graph.chain(0), vec![0, 1]);
/// ```
pub fn parse_dialog_collection(bytes: &[u8]) -> Result<DialogGraph, DialogLoaderError> {
    let collection = from_bytes::<RonDialogCollection>(bytes)?;
    let nodes = collection.dialogs.into_iter().map(|d| d.into()).collect();
    Ok(DialogGraph::new(nodes, collection.roots)?)
}
