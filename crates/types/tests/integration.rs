//! Integration tests for types

#[cfg(test)]
mod tests {
    use pinst_types::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_mixed_buffer() {
        let text = "firefox    (web browser)\n-nano\nfile:/home/me/pkg.tar.zst\n/var/cache/pkg.tar.zst";
        let set = parse(text);
        assert_eq!(set.install, vec!["firefox"]);
        assert_eq!(set.remove, vec!["nano"]);
        assert_eq!(
            set.load,
            vec!["home/me/pkg.tar.zst", "/var/cache/pkg.tar.zst"]
        );
    }

    #[test]
    fn test_action_set_serialization() {
        let set = parse("vlc -vi");
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"install":["vlc"],"remove":["vi"],"load":[]}"#);
    }

    #[test]
    fn test_color_choice_default() {
        assert_eq!(ColorChoice::default(), ColorChoice::Auto);
    }

    proptest! {
        #[test]
        fn every_token_lands_in_exactly_one_category(
            tokens in proptest::collection::vec("[a-z/:\\-]{1,12}", 0..16)
        ) {
            let text = tokens.join(" ");
            let set = parse(&text);
            prop_assert_eq!(set.len(), tokens.len());
        }

        #[test]
        fn plain_names_are_installed_in_order(
            names in proptest::collection::vec("[a-z][a-z0-9]{0,10}", 0..16)
        ) {
            let set = parse(&names.join("\n"));
            prop_assert_eq!(set.install, names);
            prop_assert!(set.remove.is_empty());
            prop_assert!(set.load.is_empty());
        }
    }
}
