use dockerfile_edit::{Dockerfile, EditError, MemStore};
use indexmap::IndexMap;
use tempfile::TempDir;

// Helper to create a Dockerfile fixture in a temp directory
fn fixture(content: &str) -> (TempDir, Dockerfile) {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("Dockerfile"), content).expect("write fixture");
    let dockerfile = Dockerfile::open(dir.path());
    (dir, dockerfile)
}

fn read_back(dir: &TempDir) -> String {
    std::fs::read_to_string(dir.path().join("Dockerfile")).expect("read fixture")
}

#[cfg(test)]
mod content_tests {
    use super::*;

    #[test]
    fn test_content_round_trip() {
        let dir = TempDir::new().expect("tempdir");
        let mut dockerfile = Dockerfile::open(dir.path());

        let content = "FROM fedora\n# comment\nCMD ls -l\n";
        dockerfile.set_content(content).expect("set_content");
        assert_eq!(dockerfile.content().expect("content"), content);
        assert_eq!(read_back(&dir), content);
    }

    #[test]
    fn test_cached_content_round_trip() {
        let dir = TempDir::new().expect("tempdir");
        // File does not exist yet; the cache stays empty until written.
        let mut dockerfile = Dockerfile::open_cached(dir.path());

        let content = "FROM busybox\n";
        dockerfile.set_content(content).expect("set_content");
        assert_eq!(dockerfile.content().expect("content"), content);
        assert_eq!(read_back(&dir), content);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = TempDir::new().expect("tempdir");
        let mut dockerfile = Dockerfile::open(dir.path());

        let err = dockerfile.baseimage().unwrap_err();
        assert!(matches!(err, EditError::Io(_)));
    }

    #[test]
    fn test_json_projection() {
        let (_dir, mut dockerfile) = fixture("FROM fedora\nCMD ls\n");
        assert_eq!(
            dockerfile.json().expect("json"),
            r#"[{"FROM":"fedora"},{"CMD":"ls"}]"#
        );
    }

    #[test]
    fn test_mem_store_edits_stay_in_memory() {
        let store = MemStore::from_content("FROM fedora\n");
        let mut dockerfile = Dockerfile::from_store(store);

        dockerfile.set_baseimage("busybox").expect("set_baseimage");
        assert_eq!(
            dockerfile.baseimage().expect("baseimage").as_deref(),
            Some("busybox")
        );
        assert_eq!(dockerfile.store().content(), "FROM busybox\n");
    }
}

#[cfg(test)]
mod value_tests {
    use super::*;

    #[test]
    fn test_replace_baseimage() {
        let (dir, mut dockerfile) = fixture("FROM fedora\nCMD ls\n");

        dockerfile.set_baseimage("busybox").expect("set_baseimage");

        assert_eq!(
            dockerfile.get_first_value("FROM").expect("get").as_deref(),
            Some("busybox")
        );
        assert_eq!(read_back(&dir), "FROM busybox\nCMD ls\n");
    }

    #[test]
    fn test_replace_collapses_continuation() {
        let (dir, mut dockerfile) = fixture("FROM fedora\nRUN a \\\n    b\nCMD x\n");

        dockerfile
            .replace_value("RUN", "make install", None)
            .expect("replace");

        assert_eq!(read_back(&dir), "FROM fedora\nRUN make install\nCMD x\n");
    }

    #[test]
    fn test_replace_with_old_value_filter() {
        let (dir, mut dockerfile) = fixture("CMD a\nCMD b\n");

        dockerfile
            .replace_value("CMD", "c", Some("a"))
            .expect("replace");

        assert_eq!(read_back(&dir), "CMD c\nCMD b\n");
    }

    #[test]
    fn test_replace_touches_every_match() {
        let (dir, mut dockerfile) = fixture("CMD a\nFROM fedora\nCMD b\n");

        dockerfile.replace_value("CMD", "x", None).expect("replace");

        assert_eq!(read_back(&dir), "CMD x\nFROM fedora\nCMD x\n");
    }

    #[test]
    fn test_replace_label_is_rejected() {
        let (dir, mut dockerfile) = fixture("LABEL a=1\n");

        let err = dockerfile.replace_value("LABEL", "a=2", None).unwrap_err();
        assert!(matches!(err, EditError::LabelReplaceUnsupported));
        assert_eq!(read_back(&dir), "LABEL a=1\n");
    }

    #[test]
    fn test_last_cmd_wins() {
        let (_dir, mut dockerfile) = fixture("CMD first\nCMD second\n");
        assert_eq!(
            dockerfile.cmd().expect("cmd").as_deref(),
            Some("second")
        );
    }

    #[test]
    fn test_delete_instructions_leaves_the_rest_alone() {
        let src = "FROM fedora\nLABEL a=1\nRUN ls\nLABEL b=2\nCMD ls -l\nLABEL c=3\n";
        let (dir, mut dockerfile) = fixture(src);

        dockerfile
            .delete_instructions("LABEL", None)
            .expect("delete");

        assert_eq!(read_back(&dir), "FROM fedora\nRUN ls\nCMD ls -l\n");
    }

    #[test]
    fn test_delete_with_value_filter() {
        let (dir, mut dockerfile) = fixture("CMD a\nCMD b\n");

        dockerfile
            .delete_instructions("CMD", Some("a"))
            .expect("delete");

        assert_eq!(read_back(&dir), "CMD b\n");
    }

    #[test]
    fn test_delete_without_match_leaves_file_untouched() {
        let (dir, mut dockerfile) = fixture("FROM fedora\n");

        dockerfile
            .delete_instructions("CMD", None)
            .expect("delete");

        assert_eq!(read_back(&dir), "FROM fedora\n");
    }

    #[test]
    fn test_append_instruction() {
        let (dir, mut dockerfile) = fixture("FROM fedora\n");

        dockerfile
            .append_instruction("EXPOSE", "80")
            .expect("append");

        assert_eq!(read_back(&dir), "FROM fedora\nEXPOSE 80\n");
    }
}

#[cfg(test)]
mod label_tests {
    use super::*;

    #[test]
    fn test_labels_merge_in_file_order() {
        let src = "LABEL name value\nLABEL \"a\"=\"b\" c=d\nLABEL name other\n";
        let (_dir, mut dockerfile) = fixture(src);

        let labels = dockerfile.labels().expect("labels");
        let pairs: Vec<(&str, &str)> = labels
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        assert_eq!(pairs, vec![("name", "other"), ("a", "b"), ("c", "d")]);
    }

    #[test]
    fn test_set_label_updates_in_place() {
        let (dir, mut dockerfile) = fixture("FROM fedora\nLABEL version=1.0\n");

        dockerfile.set_label("version", "2.0").expect("set_label");

        let labels = dockerfile.labels().expect("labels");
        assert_eq!(labels.get("version").map(String::as_str), Some("2.0"));

        let content = read_back(&dir);
        assert_eq!(content, "FROM fedora\nLABEL version=2.0\n");
        assert_eq!(content.matches("LABEL ").count(), 1);
    }

    #[test]
    fn test_set_label_preserves_sibling_pairs() {
        let (dir, mut dockerfile) = fixture("LABEL \"a\"=\"x\" \"b\"=\"y\"\n");

        dockerfile.set_label("a", "z").expect("set_label");

        assert_eq!(read_back(&dir), "LABEL a=z b=y\n");
        let labels = dockerfile.labels().expect("labels");
        assert_eq!(labels.get("b").map(String::as_str), Some("y"));
    }

    #[test]
    fn test_set_label_legacy_syntax() {
        let (dir, mut dockerfile) = fixture("LABEL maintainer foo bar\n");

        dockerfile
            .set_label("maintainer", "someone else")
            .expect("set_label");

        assert_eq!(read_back(&dir), "LABEL maintainer someone else\n");
    }

    #[test]
    fn test_set_label_requires_existing_key() {
        let (dir, mut dockerfile) = fixture("LABEL a=1\n");

        let err = dockerfile.set_label("missing", "x").unwrap_err();
        assert!(matches!(err, EditError::LabelNotFound(_)));
        assert_eq!(read_back(&dir), "LABEL a=1\n");
    }

    #[test]
    fn test_set_label_touches_only_the_first_duplicate() {
        let (dir, mut dockerfile) = fixture("LABEL k=a\nLABEL k=b\n");

        dockerfile.set_label("k", "c").expect("set_label");

        assert_eq!(read_back(&dir), "LABEL k=c\nLABEL k=b\n");
        // The merged map still reports the later instruction.
        let labels = dockerfile.labels().expect("labels");
        assert_eq!(labels.get("k").map(String::as_str), Some("b"));
    }

    #[test]
    fn test_set_labels_is_destructive() {
        let src = "FROM fedora\nLABEL a=1\nLABEL b=2\n";
        let (dir, mut dockerfile) = fixture(src);

        let mut labels = IndexMap::new();
        labels.insert("x".to_string(), "1".to_string());
        dockerfile.set_labels(&labels).expect("set_labels");

        assert_eq!(read_back(&dir), "FROM fedora\nLABEL \"x\"=\"1\"\n");
    }

    #[test]
    fn test_change_labels_fails_on_missing_key() {
        let (dir, mut dockerfile) = fixture("LABEL a=1\n");

        let mut labels = IndexMap::new();
        labels.insert("missing".to_string(), "x".to_string());
        let err = dockerfile.change_labels(&labels).unwrap_err();

        assert!(matches!(err, EditError::LabelNotFound(_)));
        assert_eq!(read_back(&dir), "LABEL a=1\n");
    }

    #[test]
    fn test_append_label_is_quoted() {
        let (dir, mut dockerfile) = fixture("FROM fedora\n");

        dockerfile.append_label("release", "1").expect("append");

        assert_eq!(read_back(&dir), "FROM fedora\nLABEL \"release\"=\"1\"\n");
        let labels = dockerfile.labels().expect("labels");
        assert_eq!(labels.get("release").map(String::as_str), Some("1"));
    }
}
