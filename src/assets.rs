/// Sub-path the card is served under when deployed to the static host.
pub const DEPLOY_BASE_PATH: &str = "/valentines-rizz";

/// True when built with `--features production`.
pub const fn is_production_build() -> bool {
    cfg!(feature = "production")
}

pub fn asset_path(path: &str, production: bool) -> String {
    if production {
        format!("{}{}", DEPLOY_BASE_PATH, path)
    } else {
        path.to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Asset {
    AmbientLoop,
    CelebrationLoop,
    ShutterCue,
    CaptureReactionCue,
    DeclineReactionCue,
    GreetingGif,
    PhotoRequestGif,
    PhotoDisplayGif,
    ProposalGif,
    AcceptedGif,
}

impl Asset {
    pub const ALL: [Asset; 10] = [
        Asset::AmbientLoop,
        Asset::CelebrationLoop,
        Asset::ShutterCue,
        Asset::CaptureReactionCue,
        Asset::DeclineReactionCue,
        Asset::GreetingGif,
        Asset::PhotoRequestGif,
        Asset::PhotoDisplayGif,
        Asset::ProposalGif,
        Asset::AcceptedGif,
    ];

    pub fn logical_path(self) -> &'static str {
        match self {
            Asset::AmbientLoop => "/Rizz Song (slowed  Reverb)  Edit.mp3",
            Asset::CelebrationLoop => "/Romantic music sound effect.mp3",
            Asset::ShutterCue => "/shutter.mp3",
            Asset::CaptureReactionCue => "/audience.mp3",
            Asset::DeclineReactionCue => "/Vine Boom sound effect meme.mp3",
            Asset::GreetingGif => "/rizzface.gif",
            Asset::PhotoRequestGif => "/wink.gif",
            Asset::PhotoDisplayGif => "/cat-mog-mogginf-cat.gif",
            Asset::ProposalGif => "/rizz.gif",
            Asset::AcceptedGif => "/eminem.gif",
        }
    }

    /// Key used by `<img data-asset="...">` placeholders in the page.
    pub fn key(self) -> &'static str {
        match self {
            Asset::AmbientLoop => "ambient",
            Asset::CelebrationLoop => "celebration",
            Asset::ShutterCue => "shutter",
            Asset::CaptureReactionCue => "capture-reaction",
            Asset::DeclineReactionCue => "decline-reaction",
            Asset::GreetingGif => "greeting",
            Asset::PhotoRequestGif => "photo-request",
            Asset::PhotoDisplayGif => "photo-display",
            Asset::ProposalGif => "valentine",
            Asset::AcceptedGif => "accepted",
        }
    }

    pub fn from_key(key: &str) -> Option<Asset> {
        Asset::ALL.into_iter().find(|asset| asset.key() == key)
    }

    pub fn url(self, production: bool) -> String {
        asset_path(self.logical_path(), production)
    }
}
