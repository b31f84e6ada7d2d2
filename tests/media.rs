use valentine_card::media::{
    AMBIENT_START_AT, AmbientState, CELEBRATION_VOLUME, Cue, MediaController, PlaybackCommand,
};
use valentine_card::stage::Stage;

#[test]
fn ambient_starts_at_offset_on_first_interaction_only() {
    let mut media = MediaController::new();
    assert_eq!(media.ambient(), AmbientState::NotEnabled);

    let commands = media.enable();
    assert_eq!(
        commands,
        vec![PlaybackCommand::Play {
            cue: Cue::Ambient,
            volume: 0.5,
            start_at: Some(AMBIENT_START_AT),
        }]
    );
    assert_eq!(media.ambient(), AmbientState::Playing);
    assert!(media.enable().is_empty());
}

#[test]
fn accepted_pauses_ambient_then_starts_celebration_once() {
    let mut media = MediaController::new();
    media.enable();

    for stage in [Stage::PhotoRequest, Stage::PhotoDisplay, Stage::Valentine] {
        assert!(media.stage_entered(stage).is_empty());
    }

    let commands = media.stage_entered(Stage::Accepted);
    assert_eq!(
        commands,
        vec![
            PlaybackCommand::Pause(Cue::Ambient),
            PlaybackCommand::Play {
                cue: Cue::Celebration,
                volume: CELEBRATION_VOLUME,
                start_at: None,
            },
        ]
    );
    assert!(media.celebration_started());
    assert_eq!(media.ambient(), AmbientState::Stopped);

    for _ in 0..3 {
        assert!(media.stage_entered(Stage::Accepted).is_empty());
    }
    assert!(media.enable().is_empty());
}

#[test]
fn celebration_without_ambient_skips_pause() {
    let mut media = MediaController::new();
    let commands = media.stage_entered(Stage::Accepted);
    assert_eq!(commands.len(), 1);
    assert!(matches!(
        commands[0],
        PlaybackCommand::Play {
            cue: Cue::Celebration,
            ..
        }
    ));
}

#[test]
fn capture_restarts_shutter_and_reaction_together() {
    let mut media = MediaController::new();
    let commands = media.capture();
    assert_eq!(commands.len(), 2);
    for (command, expected) in commands.iter().zip([Cue::Shutter, Cue::CaptureReaction]) {
        match command {
            PlaybackCommand::Play { cue, start_at, .. } => {
                assert_eq!(*cue, expected);
                assert_eq!(*start_at, Some(0.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}

#[test]
fn every_decline_approach_replays_at_full_volume() {
    let mut media = MediaController::new();
    for _ in 0..4 {
        assert_eq!(
            media.decline_approach(),
            vec![PlaybackCommand::Play {
                cue: Cue::DeclineReaction,
                volume: 1.0,
                start_at: Some(0.0),
            }]
        );
    }
}

#[test]
fn only_background_tracks_loop() {
    let looping: Vec<_> = Cue::ALL.into_iter().filter(|cue| cue.looping()).collect();
    assert_eq!(looping, vec![Cue::Ambient, Cue::Celebration]);
}
