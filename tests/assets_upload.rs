use valentine_card::assets::{Asset, DEPLOY_BASE_PATH, asset_path};
use valentine_card::upload::{MAX_PHOTO_BYTES, UploadError, validate_photo};

#[test]
fn development_paths_are_unchanged() {
    for path in ["/wink.gif", "/Rizz Song (slowed  Reverb)  Edit.mp3", "", "relative.png"] {
        assert_eq!(asset_path(path, false), path);
    }
}

#[test]
fn production_paths_get_deploy_prefix() {
    assert_eq!(asset_path("/wink.gif", true), "/valentines-rizz/wink.gif");
    assert_eq!(
        asset_path("/shutter.mp3", true),
        format!("{}/shutter.mp3", DEPLOY_BASE_PATH)
    );
}

#[test]
fn resolver_is_repeatable() {
    for production in [false, true] {
        let first = asset_path("/rizz.gif", production);
        for _ in 0..5 {
            assert_eq!(asset_path("/rizz.gif", production), first);
        }
    }
}

#[test]
fn asset_keys_round_trip_and_are_unique() {
    for asset in Asset::ALL {
        assert_eq!(Asset::from_key(asset.key()), Some(asset));
        assert!(asset.logical_path().starts_with('/'));
    }
    assert_eq!(Asset::from_key("nope"), None);

    let mut keys: Vec<_> = Asset::ALL.iter().map(|asset| asset.key()).collect();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), Asset::ALL.len());
}

#[test]
fn asset_urls_go_through_resolver() {
    assert_eq!(Asset::ProposalGif.url(false), "/rizz.gif");
    assert_eq!(
        Asset::DeclineReactionCue.url(true),
        "/valentines-rizz/Vine Boom sound effect meme.mp3"
    );
}

#[test]
fn photo_at_limit_is_accepted() {
    assert_eq!(MAX_PHOTO_BYTES, 5_242_880);
    assert_eq!(validate_photo(MAX_PHOTO_BYTES, "image/jpeg"), Ok(()));
    assert_eq!(validate_photo(0, "image/png"), Ok(()));
}

#[test]
fn photo_over_limit_is_rejected_with_size_error() {
    let err = validate_photo(MAX_PHOTO_BYTES + 1, "image/jpeg").unwrap_err();
    assert_eq!(
        err,
        UploadError::TooLarge {
            size: MAX_PHOTO_BYTES + 1
        }
    );
    assert_eq!(err.to_string(), "Photo size must be less than 5MB");
}

#[test]
fn size_is_checked_before_type() {
    let err = validate_photo(MAX_PHOTO_BYTES * 2, "application/pdf").unwrap_err();
    assert!(matches!(err, UploadError::TooLarge { .. }));
}

#[test]
fn non_image_types_are_rejected() {
    for mime in ["application/pdf", "text/plain", "", "video/mp4", "IMAGE/PNG", "img/png"] {
        let err = validate_photo(1024, mime).unwrap_err();
        assert_eq!(
            err,
            UploadError::NotAnImage {
                mime: mime.to_string()
            }
        );
        assert_eq!(err.to_string(), "Please upload an image file");
    }
}

#[test]
fn read_failure_message_is_user_facing() {
    let err = UploadError::Read("NotReadableError".to_string());
    assert_eq!(err.to_string(), "Error reading file. Please try again.");
    assert_eq!(err.label(), "read_failed");
}
