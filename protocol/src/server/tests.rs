#[cfg(test)]
mod tests {
    use crate::server::{ChoiceFault, Player, SimMessage, parse_frame};
    use crate::{Event, EventKind};

    // a real first frame from `simulate-battle`: both team preview
    // requests, the opening switches (duplicated with percentages) and
    // turn 1
    const OPENING_FRAMES: &str = r#"sideupdate
p1
|request|{"teamPreview":true,"maxTeamSize":6,"side":{"name":"p1","id":"p1","pokemon":[{"ident":"p1: Lugia","details":"Lugia, L5","condition":"28/28","active":true,"stats":{"atk":16,"def":20,"spa":16,"spd":23,"spe":18},"moves":["tackle","recover","calmmind","roost"],"baseAbility":"multiscale","item":"heavydutyboots","pokeball":"pokeball","ability":"multiscale"}]}}
sideupdate
p1
|request|{"active":[{"moves":[{"move":"Tackle","id":"tackle","pp":56,"maxpp":56,"target":"normal","disabled":false},{"move":"Recover","id":"recover","pp":16,"maxpp":16,"target":"self","disabled":false},{"move":"Calm Mind","id":"calmmind","pp":32,"maxpp":32,"target":"self","disabled":false},{"move":"Roost","id":"roost","pp":16,"maxpp":16,"target":"self","disabled":false}],"canDynamax":true,"maxMoves":{"maxMoves":[{"move":"maxstrike","target":"adjacentFoe"},{"move":"maxguard","target":"self"},{"move":"maxguard","target":"self"},{"move":"maxguard","target":"self"}]}}],"side":{"name":"p1","id":"p1","pokemon":[{"ident":"p1: Lugia","details":"Lugia, L5","condition":"28/28","active":true,"stats":{"atk":16,"def":20,"spa":16,"spd":23,"spe":18},"moves":["tackle","recover","calmmind","roost"],"baseAbility":"multiscale","item":"heavydutyboots","pokeball":"pokeball","ability":"multiscale"}]}}
update
|t:|1609958280
|player|p1|p1||
|player|p2|p2||
|teamsize|p1|2
|teamsize|p2|2
|gametype|singles
|gen|8
|tier|[Gen 8] Anything Goes
|rule|HP Percentage Mod: HP is shown in percentages
|
|t:|1609958280
|start
|split|p1
|switch|p1a: Lugia|Lugia, L5|28/28
|switch|p1a: Lugia|Lugia, L5|100/100
|split|p2
|switch|p2a: Zoroark|Zoroark, L5, M|23/23
|switch|p2a: Zoroark|Zoroark, L5, M|100/100
|-ability|p2a: Zoroark|Intimidate|boost
|-unboost|p1a: Lugia|atk|1
|turn|1"#;

    fn events(messages: &[SimMessage]) -> Vec<Event> {
        messages
            .iter()
            .filter_map(|m| match m {
                SimMessage::Event(e) => Some(e.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_parse_opening_frames() {
        let messages = parse_frame(OPENING_FRAMES).unwrap();

        // one real side update (the team preview request is discarded)
        let updates: Vec<_> = messages
            .iter()
            .filter_map(|m| match m {
                SimMessage::SideUpdate { player, request } => Some((player, request)),
                _ => None,
            })
            .collect();
        assert_eq!(updates.len(), 1);
        assert_eq!(*updates[0].0, Player::P1);

        let request = updates[0].1;
        assert!(!request.team_preview);
        assert_eq!(request.active.as_ref().unwrap().len(), 1);
        assert_eq!(request.active.as_ref().unwrap()[0].moves.len(), 4);
        assert_eq!(request.side.as_ref().unwrap().pokemon[0].ident, "p1: Lugia");

        // two switches (deduped), ability, unboost, turn
        let evts = events(&messages);
        let kinds: Vec<EventKind> = evts.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Switch,
                EventKind::Switch,
                EventKind::Ability,
                EventKind::Unboost,
                EventKind::Turn,
            ]
        );
        assert_eq!(evts[4].magnitude, 1);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let frame = "|switch|p1a: Pincurchin|Pincurchin, L88, M|228/228\n|switch|p1a: Pincurchin|Pincurchin, L88, M|100/100";
        let messages = parse_frame(frame).unwrap();

        let evts = events(&messages);
        assert_eq!(evts.len(), 1);
        assert_eq!(evts[0].kind, EventKind::Switch);
        assert_eq!(evts[0].magnitude, 100);
    }

    #[test]
    fn test_dedup_different_subject_kept() {
        // consecutive switches about different pokemon are both real
        let frame = "|switch|p1a: Pincurchin|Pincurchin, L88, M|228/228\n|switch|p2a: Umbreon|Umbreon, L88, M|100/100";
        let messages = parse_frame(frame).unwrap();

        assert_eq!(events(&messages).len(), 2);
    }

    #[test]
    fn test_error_classification() {
        let invalid = parse_frame("|error|[Invalid choice] Can't move: ...").unwrap();
        assert!(matches!(
            invalid[0],
            SimMessage::Fault(ChoiceFault::Invalid(_))
        ));

        let unavailable =
            parse_frame("|error|[Unavailable choice] Can't move: Bite is disabled").unwrap();
        assert!(matches!(
            unavailable[0],
            SimMessage::Fault(ChoiceFault::Unavailable(_))
        ));

        let other = parse_frame("|error|something went sideways").unwrap();
        match &other[0] {
            SimMessage::Fault(ChoiceFault::Protocol(msg)) => {
                assert_eq!(msg, "something went sideways")
            }
            got => panic!("expected protocol fault, got {:?}", got),
        }
    }

    #[test]
    fn test_team_preview_error_discarded() {
        let messages =
            parse_frame("|error|[Invalid choice] Can't choose for Team Preview: ...").unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_dropped_lines() {
        let frame = "|split|p1\n|t:|1609958280\n|gametype|singles\n|gen|8\n|rule|whatever\n|teampreview\n|\n|upkeep";
        let messages = parse_frame(frame).unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_unknown_tag_dropped() {
        let messages = parse_frame("|somenewthing|p1a: Lugia|whatever").unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_bad_request_json_is_error() {
        let frame = "sideupdate\np1\n|request|{\"active\": nope}";
        assert!(parse_frame(frame).is_err());
    }

    #[test]
    fn test_request_without_player_line_is_error() {
        let frame = "|request|{\"wait\":true}";
        assert!(parse_frame(frame).is_err());
    }

    #[test]
    fn test_nul_padding_tolerated() {
        let frame = "|turn|3\u{0}\u{0}";
        let messages = parse_frame(frame).unwrap();
        assert_eq!(events(&messages)[0].magnitude, 3);
    }
}
