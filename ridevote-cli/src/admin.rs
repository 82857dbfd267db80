//! Admin commands: `reset`, `brand` and `media`.
//!
//! Each command resolves the logged-in member against the roster before it
//! changes the store. Without a roster nobody holds the admin role.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use ridevote_core::{AttractionId, AttractionOverride, DisplayStore, RankingStore};
use serde::{Deserialize, Serialize};

use crate::workspace::{self, Workspace};
use crate::{
    ARG_APP_NAME, ARG_ATTRACTION, ARG_DATA_DIR, ARG_ICON_URL, ARG_IMAGE_URL, ARG_ROSTER,
    ARG_VIDEO_URL, ARG_YES, CliError, ENV_MEDIA_ATTRACTION,
};

/// CLI arguments for the `reset` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "reset",
    long_about = "Delete every stored ranking in one step. Only roster \
                 admins may reset, and the command refuses to run without \
                 --yes.",
    about = "Delete every ranking (admin only)"
)]
#[ortho_config(prefix = "RIDEVOTE")]
pub(crate) struct ResetArgs {
    /// Directory holding the ranking database and session marker.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// JSON roster listing members and their roles.
    #[arg(long = ARG_ROSTER, value_name = "path")]
    #[serde(default)]
    pub(crate) roster: Option<Utf8PathBuf>,
    /// Confirm the deletion.
    #[arg(
        long = ARG_YES,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) yes: Option<bool>,
}

pub(crate) fn run_reset(args: &ResetArgs) -> Result<Vec<String>, CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let workspace = Workspace::new(merged.data_dir);
    require_admin(&workspace, merged.roster.as_deref())?;
    if !merged.yes.unwrap_or(false) {
        return Err(CliError::ConfirmationRequired { action: "reset" });
    }
    let report = workspace.open_store()?.delete_all_rankings()?;
    Ok(vec![format!("Removed {} ranking(s).", report.deleted)])
}

/// CLI arguments for the `brand` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "brand",
    long_about = "Print the app name and icon. Passing --app-name or \
                 --icon-url changes them, which only roster admins may do.",
    about = "Show or change the app name and icon"
)]
#[ortho_config(prefix = "RIDEVOTE")]
pub(crate) struct BrandArgs {
    /// Directory holding the ranking database and session marker.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// JSON roster listing members and their roles.
    #[arg(long = ARG_ROSTER, value_name = "path")]
    #[serde(default)]
    pub(crate) roster: Option<Utf8PathBuf>,
    /// New display name for the app.
    #[arg(long = ARG_APP_NAME, value_name = "name")]
    #[serde(default)]
    pub(crate) app_name: Option<String>,
    /// New icon link.
    #[arg(long = ARG_ICON_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) icon_url: Option<String>,
}

pub(crate) fn run_brand(args: &BrandArgs) -> Result<Vec<String>, CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let workspace = Workspace::new(merged.data_dir);
    let store = workspace.open_store()?;
    let mut branding = store.branding()?;

    if merged.app_name.is_some() || merged.icon_url.is_some() {
        require_admin(&workspace, merged.roster.as_deref())?;
        if let Some(name) = merged.app_name {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(CliError::InvalidArgument {
                    field: ARG_APP_NAME,
                    message: "app name must not be blank".to_owned(),
                });
            }
            branding.app_name = trimmed.to_owned();
        }
        if let Some(url) = merged.icon_url {
            branding.app_icon_url = Some(url).filter(|link| !link.trim().is_empty());
        }
        store.put_branding(branding.clone())?;
        log::info!("branding changed to {:?}", branding.app_name);
    }

    Ok(vec![
        format!("App name: {}", branding.app_name),
        format!(
            "Icon: {}",
            branding.app_icon_url.as_deref().unwrap_or("(bundled)")
        ),
    ])
}

/// CLI arguments for the `media` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "media",
    long_about = "Print the picture and ride-through video shown for one \
                 attraction. Passing --image-url or --video-url replaces \
                 them, which only roster admins may do.",
    about = "Show or set the media of an attraction"
)]
#[ortho_config(prefix = "RIDEVOTE")]
pub(crate) struct MediaArgs {
    /// Attraction id, for example `dlp_2`.
    #[arg(value_name = ARG_ATTRACTION)]
    #[serde(default)]
    pub(crate) attraction: Option<String>,
    /// Directory holding the ranking database and session marker.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// JSON roster listing members and their roles.
    #[arg(long = ARG_ROSTER, value_name = "path")]
    #[serde(default)]
    pub(crate) roster: Option<Utf8PathBuf>,
    /// Replacement card picture.
    #[arg(long = ARG_IMAGE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) image_url: Option<String>,
    /// Replacement ride-through video.
    #[arg(long = ARG_VIDEO_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) video_url: Option<String>,
}

pub(crate) fn run_media(args: &MediaArgs) -> Result<Vec<String>, CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let raw_id = merged.attraction.ok_or(CliError::MissingArgument {
        field: ARG_ATTRACTION,
        env: ENV_MEDIA_ATTRACTION,
    })?;
    let id = AttractionId::new(raw_id).map_err(|err| CliError::InvalidArgument {
        field: ARG_ATTRACTION,
        message: err.to_string(),
    })?;
    let workspace = Workspace::new(merged.data_dir);
    let store = workspace.open_store()?;
    let catalog = workspace::catalog(&store)?;
    let (name, mut details) = catalog
        .get(&id)
        .map(|attraction| (attraction.name.clone(), attraction.details.clone()))
        .ok_or_else(|| CliError::InvalidArgument {
            field: ARG_ATTRACTION,
            message: format!("{id} is not in the catalog"),
        })?;

    if merged.image_url.is_some() || merged.video_url.is_some() {
        require_admin(&workspace, merged.roster.as_deref())?;
        let current = store
            .attraction_overrides()?
            .into_iter()
            .find(|entry| entry.attraction_id == id);
        let mut entry = current.unwrap_or(AttractionOverride {
            attraction_id: id,
            image_url: None,
            video_url: None,
        });
        if let Some(url) = merged.image_url {
            details.image_url = Some(url.clone());
            entry.image_url = Some(url);
        }
        if let Some(url) = merged.video_url {
            details.video_url = Some(url.clone());
            entry.video_url = Some(url);
        }
        log::info!("media for {} updated", entry.attraction_id);
        store.put_attraction_override(entry)?;
    }

    Ok(vec![
        format!("Media for {name}:"),
        format!("Image: {}", details.image_url.as_deref().unwrap_or("(none)")),
        format!("Video: {}", details.video_url.as_deref().unwrap_or("(none)")),
    ])
}

fn require_admin(workspace: &Workspace, roster: Option<&Utf8Path>) -> Result<(), CliError> {
    let members = workspace::load_roster(roster)?;
    let session = workspace.require_session(members.as_ref())?;
    Ok(session.require_admin()?)
}
