#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![forbid(unsafe_code)]
#![warn(clippy::doc_markdown)]
// Often exceeded by queries
#![allow(clippy::type_complexity)]
// Unhelpful for systems
#![allow(clippy::too_many_arguments)]

//! [`bevy_conversations`] is a Bevy plugin that walks branching NPC
//! conversations.
//!
//! Dialogs are gated by requirements on the NPC, the player and the world,
//! carry their text in several languages, and fire notifications when the
//! player picks an option. The game asks the [`ConversationEngine`](prelude::ConversationEngine)
//! for the next screen and renders it however it likes.

use bevy::prelude::*;
use prelude::{ConversationEngine, DialogGraph, DialogLoader, EngineSettings};

pub mod asset;
pub mod context;
pub mod conversation;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod localization;
pub mod notifications;
pub mod prelude;
pub mod requirements;

/// The plugin that loads dialog graphs and makes the [`ConversationEngine`] available.
///
/// With a `saved_dialogs` path the graph is loaded through the [`AssetServer`] at
/// startup, and the engine is reloaded whenever the file changes.
#[derive(Debug, Default, Clone)]
pub struct ConversationsPlugin {
    /// The settings of the engine.
    pub settings: EngineSettings,
    /// The `.dialog.ron` file to load, relative to the asset folder.
    pub saved_dialogs: Option<String>,
}

impl ConversationsPlugin {
    /// A plugin that loads the given dialog file.
    pub fn with_saved_dialogs(path: impl Into<String>) -> Self {
        Self {
            saved_dialogs: Some(path.into()),
            ..default()
        }
    }

    /// Replaces the engine settings.
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl Plugin for ConversationsPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<DialogGraph>()
            .init_asset_loader::<DialogLoader>()
            .insert_resource(ConversationEngine::new(self.settings.clone()))
            .insert_resource(SavedDialogs {
                path: self.saved_dialogs.clone(),
                handle: None,
            })
            .add_systems(Startup, load_saved_dialogs)
            .add_systems(Update, reload_engine);
    }
}

/// The dialog file the engine is kept in sync with.
#[derive(Resource, Debug, Default, Clone)]
pub struct SavedDialogs {
    /// The path the file is loaded from.
    pub path: Option<String>,
    /// The handle of the loaded graph. Setting it directly also works.
    pub handle: Option<Handle<DialogGraph>>,
}

/// Starts loading the saved dialogs file.
fn load_saved_dialogs(server: Res<AssetServer>, mut saved: ResMut<SavedDialogs>) {
    let Some(path) = saved.path.clone() else {
        warn!("no saved dialogs file configured, no dialogs will be available");
        return;
    };
    info!("loading saved dialogs from {path}");
    saved.handle = Some(server.load(path));
}

/// Hands the saved graph to the engine whenever it is loaded or changed.
fn reload_engine(
    mut events: EventReader<AssetEvent<DialogGraph>>,
    saved: Res<SavedDialogs>,
    graphs: Res<Assets<DialogGraph>>,
    mut engine: ResMut<ConversationEngine>,
) {
    let Some(handle) = &saved.handle else {
        events.clear();
        return;
    };
    let id = handle.id();

    let mut changed = false;
    for event in events.read() {
        changed |= event.is_added(id) || event.is_loaded_with_dependencies(id) || event.is_modified(id);
    }
    if !changed {
        return;
    }

    if engine.load_graph(graphs.get(id)) {
        info!("conversation engine loaded {} dialogs", graphs.get(id).map_or(0, DialogGraph::len));
    } else {
        error!("saved dialogs changed but the graph is not available");
    }
}

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::{
        prelude::{ConversationEngine, DialogGraph, DialogNode, EngineSettings},
        ConversationsPlugin, SavedDialogs,
    };

    /// A minimal Bevy app with the conversations plugin.
    pub fn minimal_app(plugin: ConversationsPlugin) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), plugin));
        app
    }

    fn run(app: &mut App) {
        for _ in 0..3 {
            app.update();
        }
    }

    #[test]
    fn plugin_inserts_the_engine() {
        let mut settings = EngineSettings::default();
        settings.use_end_conversation_fallback = true;
        let mut app = minimal_app(ConversationsPlugin::default().with_settings(settings.clone()));
        app.update();

        let engine = app.world.resource::<ConversationEngine>();
        assert!(!engine.is_loaded());
        assert_eq!(engine.settings(), &settings);
        assert!(app.world.resource::<SavedDialogs>().handle.is_none());
    }

    #[test]
    fn saved_path_starts_loading() {
        let mut app = minimal_app(ConversationsPlugin::with_saved_dialogs("dialogs/merchant.dialog.ron"));
        app.update();
        let saved = app.world.resource::<SavedDialogs>();
        assert_eq!(saved.path.as_deref(), Some("dialogs/merchant.dialog.ron"));
        assert!(saved.handle.is_some());
    }

    #[test]
    fn engine_follows_the_saved_graph() {
        let mut app = minimal_app(ConversationsPlugin::default());
        app.update();

        let graph = DialogGraph::new(vec![DialogNode::new(0)], vec![0]).unwrap();
        let handle = app.world.resource_mut::<Assets<DialogGraph>>().add(graph.clone());
        app.world.resource_mut::<SavedDialogs>().handle = Some(handle.clone());
        run(&mut app);
        assert_eq!(app.world.resource::<ConversationEngine>().graph(), Some(&graph));

        let edited = DialogGraph::new(vec![DialogNode::new(0), DialogNode::new(1)], vec![0, 1]).unwrap();
        if let Some(stored) = app.world.resource_mut::<Assets<DialogGraph>>().get_mut(&handle) {
            *stored = edited.clone();
        }
        run(&mut app);
        assert_eq!(app.world.resource::<ConversationEngine>().graph(), Some(&edited));
    }

    #[test]
    fn other_graphs_are_ignored() {
        let mut app = minimal_app(ConversationsPlugin::default());
        app.update();

        let saved = DialogGraph::new(vec![DialogNode::new(0)], vec![0]).unwrap();
        let handle = app.world.resource_mut::<Assets<DialogGraph>>().add(saved.clone());
        app.world.resource_mut::<SavedDialogs>().handle = Some(handle);
        run(&mut app);

        let other = DialogGraph::new(vec![DialogNode::new(5)], vec![5]).unwrap();
        let _other = app.world.resource_mut::<Assets<DialogGraph>>().add(other);
        run(&mut app);
        assert_eq!(app.world.resource::<ConversationEngine>().graph(), Some(&saved));
    }
}
