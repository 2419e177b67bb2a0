//! Integration tests for the JSON pathway store
//!
//! Each test works against a file in its own temporary directory.

use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

use pathway_explorer::config::StoreConfig;
use pathway_explorer::models::{Compound, Pathway, PathwayDraft, PathwayMetadata, Reaction};
use pathway_explorer::store::{AddOutcome, PathwayStore};

fn draft(value: serde_json::Value) -> PathwayDraft {
    serde_json::from_value(value).expect("valid draft JSON")
}

fn named(name: &str) -> Pathway {
    Pathway::new(
        format!("ID_{}", name),
        name,
        PathwayMetadata::new("KEGG", 0.9).unwrap(),
    )
}

#[cfg(test)]
mod load_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let store = PathwayStore::open(dir.path().join("metabolic_pathways.json"));
        assert!(store.is_empty());
        assert!(store.names().is_empty());
    }

    #[test]
    fn test_invalid_json_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metabolic_pathways.json");
        fs::write(&path, "{not json").unwrap();

        let store = PathwayStore::open(&path);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_unreadable_path_starts_empty() {
        let dir = tempdir().unwrap();
        // A directory where the file should be makes the read fail.
        let path = dir.path().join("metabolic_pathways.json");
        fs::create_dir(&path).unwrap();

        let store = PathwayStore::open(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_names_preserve_document_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metabolic_pathways.json");
        let document = json!({
            "pathways": [
                {"id": "1", "name": "A", "metadata": {"source": "KEGG", "confidence": 0.9}},
                {"id": "2", "name": "B", "metadata": {"source": "KEGG", "confidence": 0.8}},
                {"id": "3", "name": "C", "metadata": {"source": "LLM", "confidence": 0.7}}
            ],
            "last_updated": "2024-05-01T08:00:00.000000"
        });
        fs::write(&path, document.to_string()).unwrap();

        let store = PathwayStore::open(&path);
        assert_eq!(store.names(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_invalid_entries_are_held_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metabolic_pathways.json");
        let document = json!({
            "pathways": [
                {"id": "1", "name": "A", "metadata": {"source": "KEGG", "confidence": 0.9}},
                {"id": "2", "name": "B", "metadata": {"source": "KEGG", "confidence": 4.0}},
                {"name": "C"}
            ],
            "last_updated": "2024-05-01T08:00:00Z"
        });
        fs::write(&path, document.to_string()).unwrap();

        let store = PathwayStore::open(&path);
        assert_eq!(store.len(), 1);
        assert_eq!(store.pathways()[0].name, "A");
        assert_eq!(store.rejected_count(), 2);
        assert_eq!(store.names(), vec!["A", "B", "C"]);
        assert!(store.contains("C"));
    }

    #[test]
    fn test_unreadable_document_timestamp_keeps_pathways() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metabolic_pathways.json");
        let document = json!({
            "pathways": [
                {"id": "1", "name": "A", "metadata": {"source": "KEGG", "confidence": 0.9}},
                {"id": "2", "name": "B", "metadata": {"source": "KEGG", "confidence": 0.8}}
            ],
            "last_updated": "last tuesday"
        });
        fs::write(&path, document.to_string()).unwrap();

        let mut store = PathwayStore::open(&path);
        assert_eq!(store.names(), vec!["A", "B"]);

        store.save().unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["pathways"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_space_separated_and_date_only_timestamps_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metabolic_pathways.json");
        let document = json!({
            "pathways": [
                {"id": "1", "name": "A",
                 "metadata": {"source": "KEGG", "confidence": 0.9, "last_updated": "2024-05-01"}},
                {"id": "2", "name": "B",
                 "metadata": {"source": "KEGG", "confidence": 0.8, "last_updated": "2024-05-01 08:00:00"}}
            ],
            "last_updated": "2024-05-01 08:00:00"
        });
        fs::write(&path, document.to_string()).unwrap();

        let store = PathwayStore::open(&path);
        assert_eq!(store.len(), 2);
        assert_eq!(store.last_updated().to_rfc3339(), "2024-05-01T08:00:00+00:00");
        assert_eq!(
            store.get("A").unwrap().metadata.last_updated.to_rfc3339(),
            "2024-05-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_load_from_config() {
        let dir = tempdir().unwrap();
        let config = StoreConfig {
            path: dir.path().join("data").join("pathways.json"),
        };
        let store = PathwayStore::load(&config);
        assert_eq!(store.path(), config.path.as_path());
        assert!(dir.path().join("data").is_dir());
    }
}

#[cfg(test)]
mod add_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_duplicate_name_keeps_first_version() {
        let dir = tempdir().unwrap();
        let mut store = PathwayStore::open(dir.path().join("p.json"));

        let first = store
            .add_draft(draft(json!({
                "name": "Glycolysis",
                "id": "GLY001",
                "metadata": {"source": "KEGG", "confidence": 0.9}
            })))
            .unwrap();
        let second = store
            .add_draft(draft(json!({
                "name": "Glycolysis",
                "id": "GLY001",
                "metadata": {"source": "KEGG", "confidence": 0.2}
            })))
            .unwrap();

        assert_eq!(first, AddOutcome::Added);
        assert_eq!(second, AddOutcome::Duplicate);
        assert_eq!(store.names(), vec!["Glycolysis"]);
        assert_eq!(store.get("Glycolysis").unwrap().metadata.confidence, 0.9);
    }

    #[test]
    fn test_duplicate_with_different_fields_is_noop() {
        let dir = tempdir().unwrap();
        let mut store = PathwayStore::open(dir.path().join("p.json"));

        let original = named("TCA cycle").with_description("Citric acid cycle");
        store.add(original.clone());
        store.add(
            Pathway::new("OTHER", "TCA cycle", PathwayMetadata::new("LLM", 0.1).unwrap())
                .with_compound(Compound::new("C1", "Citrate")),
        );

        assert_eq!(store.len(), 1);
        assert_eq!(store.pathways()[0], original);
    }

    #[test]
    fn test_add_draft_rejects_invalid() {
        let dir = tempdir().unwrap();
        let mut store = PathwayStore::open(dir.path().join("p.json"));

        let result = store.add_draft(draft(json!({"name": "No id"})));
        assert!(result.is_err());
        assert!(store.is_empty());
    }
}

#[cfg(test)]
mod save_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip_preserves_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.json");

        let glycolysis = named("Glycolysis")
            .with_description("Glucose to pyruvate")
            .with_compound(Compound::new("C00031", "Glucose").with_formula("C6H12O6"))
            .with_compound(Compound::new("C00022", "Pyruvate"))
            .with_reaction(
                Reaction::new(vec!["C00031".to_string()], vec!["C00022".to_string()])
                    .with_enzymes(vec!["EC:2.7.1.1".to_string()]),
            )
            .with_related("TCA001");
        let tca = named("TCA cycle");

        let mut store = PathwayStore::open(&path);
        store.add(glycolysis.clone());
        store.add(tca.clone());
        store.save().unwrap();

        let reloaded = PathwayStore::open(&path);
        assert_eq!(reloaded.names(), vec!["Glycolysis", "TCA cycle"]);
        assert_eq!(reloaded.get("Glycolysis").unwrap(), &glycolysis);
        assert_eq!(reloaded.get("TCA cycle").unwrap(), &tca);
    }

    #[test]
    fn test_saved_document_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.json");

        let mut store = PathwayStore::open(&path);
        store.add(named("Glycolysis"));
        store.save().unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"pathways\""), "expected 2-space indent");

        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["last_updated"].is_string());
        assert_eq!(value["pathways"][0]["name"], "Glycolysis");
        assert_eq!(value["pathways"][0]["metadata"]["verification_status"], "unverified");
    }

    #[test]
    fn test_save_overwrites_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.json");
        fs::write(&path, "{not json").unwrap();

        let mut store = PathwayStore::open(&path);
        store.add(named("Glycolysis"));
        store.save().unwrap();

        let reloaded = PathwayStore::open(&path);
        assert_eq!(reloaded.names(), vec!["Glycolysis"]);
    }

    #[test]
    fn test_save_writes_back_unreadable_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metabolic_pathways.json");
        let legacy = json!({
            "name": "Flavonoid biosynthesis",
            "description": "Plant pigments",
            "compounds": ["Naringenin", "Kaempferol"],
            "enzymes": ["CHS", "F3H"]
        });
        let document = json!({
            "pathways": [
                legacy.clone(),
                {"id": "1", "name": "A", "metadata": {"source": "KEGG", "confidence": 0.9}},
                {"id": "9", "name": "A", "metadata": {"source": "LLM", "confidence": 0.1}}
            ],
            "last_updated": "2024-05-01T08:00:00Z"
        });
        fs::write(&path, document.to_string()).unwrap();

        let mut store = PathwayStore::open(&path);
        assert_eq!(
            store.add(named("Flavonoid biosynthesis")),
            AddOutcome::Duplicate
        );
        assert_eq!(store.add(named("Glycolysis")), AddOutcome::Added);
        store.save().unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let on_disk = value["pathways"].as_array().unwrap();
        assert_eq!(on_disk.len(), 4);
        assert_eq!(on_disk[0], legacy);
        assert_eq!(on_disk[1]["id"], "1");
        assert_eq!(on_disk[2]["id"], "9");
        assert_eq!(on_disk[3]["name"], "Glycolysis");

        let reloaded = PathwayStore::open(&path);
        assert_eq!(
            reloaded.names(),
            vec!["Flavonoid biosynthesis", "A", "Glycolysis"]
        );
    }

    #[test]
    fn test_save_failure_propagates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.json");
        let mut store = PathwayStore::open(&path);
        store.add(named("Glycolysis"));

        // Replace the target with a non-empty directory so the rename fails.
        fs::create_dir(&path).unwrap();
        fs::write(path.join("blocker"), "x").unwrap();

        assert!(store.save().is_err());
    }
}
