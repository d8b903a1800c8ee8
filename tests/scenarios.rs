use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tempfile::{TempDir, tempdir};

use potemkin::source::{DynSource, InMemorySource, RecordSource};
use potemkin::{
    Aggregator, BenchmarkConfig, BenchmarkLayout, Catalog, Correctness, DefineSource, Domain,
    DomainClassifier, EditSource, GenerateSource, GroupKey, KeystoneIndex, LabelSet,
    ModelCanonicalizer, PotemkinError, PotemkinReport, Record, Task,
};

fn write(path: impl AsRef<Path>, body: &str) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

fn collect(source: &dyn RecordSource) -> Vec<Record> {
    source.stream().unwrap().collect::<Result<_, _>>().unwrap()
}

/// A small benchmark tree using the default layout and built-in catalog.
fn benchmark_tree() -> TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();

    write(
        root.join("define/define_labels.csv"),
        "Concept,Model,File,Correct\n\
         Haiku,gpt-4o,0.txt,1.0\n\
         Stag Hunt,gpt-4o,0.txt,yes\n\
         Confirmation Bias,deepseek-ai/DeepSeek-R1,0.txt,no\n\
         Sonnet,gpt-4o,5.txt,yes\n",
    );
    write(
        root.join("define/inferences/Haiku/gpt-4o/0.txt"),
        "Gold fish swims slow...",
    );
    write(
        root.join("define/inferences/Stag Hunt/gpt-4o/0.txt"),
        "A coordination game.",
    );

    write(
        root.join("classify/psych_classify_with_cot.csv"),
        "Concept,Model,Inference,Correct\n\
         Confirmation Bias,deepseek-ai/DeepSeek-R1,reasoning,1\n",
    );
    write(
        root.join("classify/literature_and_game_theory_classify_with_cot.csv"),
        "Concept,Model,Inference,Correct\n\
         Haiku,gpt-4o,\"yes, 5-7-5\",1\n\
         Haiku,gpt-4o,no,0\n\
         Stag Hunt,gpt-4o,reasoning,1\n",
    );

    write(
        root.join("generate/author_labels_generate.csv"),
        "Concept,Model,File,Correct\n\
         Haiku,gpt-4o,0.json,yes\n\
         Stag Hunt,gpt-4o,0.json,no\n",
    );
    write(
        root.join("generate/inferences/Haiku/GPT-4o/0.json"),
        &json!({"correct": true, "inferences": "example text"}).to_string(),
    );
    write(
        root.join("generate/inferences/Stag Hunt/GPT-4o/0.json"),
        &json!({"correct": [false, true], "inferences": "hunt", "concept": "Stag Hunt", "round": 2})
            .to_string(),
    );
    write(
        root.join("generate/inferences/Stag Hunt/GPT-4o/1.json"),
        "{ truncated",
    );

    write(
        root.join("edit/author_labels_edit.csv"),
        "Concept,Model,File,Correct\n\
         Haiku,gpt-4o,0.json,no\n\
         Sonnet,Qwen/Qwen2-VL-72B-Instruct,0.json,yes\n",
    );
    write(
        root.join("edit/inferences/Haiku/GPT-4o/0.json"),
        &json!({"correct": false, "inferences": "edited"}).to_string(),
    );
    temp
}

#[test]
fn define_row_with_content_seeds_the_keystone_index() {
    let temp = benchmark_tree();
    let report = PotemkinReport::from_config(&BenchmarkConfig::new(temp.path()));
    let index = report.keystone_index().unwrap();
    assert!(index.contains("Haiku", "GPT-4o"));
    assert!(index.contains("Stag Hunt", "GPT-4o"));
    assert!(index.contains("Sonnet", "GPT-4o"));
    assert!(!index.contains("Confirmation Bias", "DeepSeek-R1"));
    assert!(!index.contains("Haiku", "gpt-4o"));
}

#[test]
fn generate_bundle_for_labeled_concept_yields_one_record() {
    let temp = benchmark_tree();
    let layout = BenchmarkLayout::new(temp.path());
    let source = GenerateSource::from_layout(&layout, Arc::new(Catalog::default()));
    let records = collect(&source);

    let haiku: Vec<&Record> = records.iter().filter(|r| r.concept == "Haiku").collect();
    assert_eq!(haiku.len(), 1);
    assert_eq!(haiku[0].correct, Correctness::Yes);
    assert_eq!(haiku[0].content.as_deref(), Some("example text"));
    assert_eq!(haiku[0].domain, Domain::LiteraryTechniques);

    // Stag Hunt comes from directory enumeration only; its label row is ignored
    // and the truncated bundle is skipped.
    let hunt: Vec<&Record> = records.iter().filter(|r| r.concept == "Stag Hunt").collect();
    assert_eq!(hunt.len(), 1);
    assert_eq!(hunt[0].correct, Correctness::No);
    assert_eq!(hunt[0].content.as_deref(), Some("hunt"));
    assert_eq!(hunt[0].extra.get("round"), Some(&json!(2)));
    assert!(hunt[0].extra.get("concept").is_none());
}

#[test]
fn edit_row_without_model_directory_emits_nothing() {
    let temp = benchmark_tree();
    let layout = BenchmarkLayout::new(temp.path());
    let source = EditSource::from_layout(&layout, Arc::new(Catalog::default()));
    let records = collect(&source);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].pair(), ("Haiku", "GPT-4o"));
    assert!(records.iter().all(|r| r.model != "Qwen2-VL"));
}

#[test]
fn define_row_with_missing_content_emits_null_content() {
    let temp = benchmark_tree();
    let layout = BenchmarkLayout::new(temp.path());
    let source = DefineSource::from_layout(&layout, Arc::new(Catalog::default()));
    let records = collect(&source);
    assert_eq!(records.len(), 4);
    let sonnet: Vec<&Record> = records.iter().filter(|r| r.concept == "Sonnet").collect();
    assert_eq!(sonnet.len(), 1);
    assert_eq!(sonnet[0].content, None);
    assert_eq!(sonnet[0].correct, Correctness::Yes);
}

fn record(task: Task, concept: &str, model: &str, correct: bool) -> Record {
    Record {
        concept: concept.into(),
        model: model.into(),
        domain: Domain::Unknown,
        task,
        correct: Correctness::from(correct),
        source_file: "memory".into(),
        content: None,
        extra: Default::default(),
    }
}

#[test]
fn generate_rate_counts_only_keystone_pairs() {
    let sources: Vec<DynSource> = vec![
        Arc::new(InMemorySource::new(
            "define",
            Task::Define,
            vec![record(Task::Define, "X", "M", true)],
        )),
        Arc::new(InMemorySource::new(
            "generate",
            Task::Generate,
            vec![
                record(Task::Generate, "X", "M", true),
                record(Task::Generate, "X", "M", false),
                record(Task::Generate, "Y", "M", true),
            ],
        )),
    ];
    let aggregator = Aggregator::new(sources);
    assert_eq!(
        aggregator.build_keystone_index().unwrap(),
        [("X".to_string(), "M".to_string())]
            .into_iter()
            .collect::<KeystoneIndex>()
    );
    let conditioned = aggregator.conditioned_rate_by_task().unwrap();
    let generate = conditioned.get("Generate").unwrap();
    assert_eq!((generate.numerator, generate.denominator), (1, 2));
    assert_eq!(generate.rate, Some(50.0));
}

#[test]
fn full_tree_report() {
    let temp = benchmark_tree();
    let report = PotemkinReport::from_config(&BenchmarkConfig::new(temp.path()));

    let counts = report.inference_counts().unwrap();
    assert_eq!(counts.count("Define"), 4);
    assert_eq!(counts.count("Classify"), 4);
    assert_eq!(counts.count("Generate"), 2);
    assert_eq!(counts.count("Edit"), 1);
    assert_eq!(counts.total, 11);

    // Keystones: (Haiku, GPT-4o), (Stag Hunt, GPT-4o), (Sonnet, GPT-4o).
    // Classify: Haiku yes/no + Stag Hunt yes -> 2/3.
    // Generate: Haiku yes + Stag Hunt no -> 1/2. Edit: Haiku no -> 0/1.
    let conditioned = report.conditioned_by_task().unwrap();
    let classify = conditioned.get("Classify").unwrap();
    assert_eq!((classify.numerator, classify.denominator), (2, 3));
    let classify_rate = classify.rate.unwrap();
    assert!((classify_rate - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(conditioned.rate("Generate"), Some(50.0));
    assert_eq!(conditioned.rate("Edit"), Some(100.0));

    let by_domain = report.by_domain().unwrap();
    assert!(by_domain.get("Unknown").is_none());
    let bias = by_domain.get("Psychological Biases").unwrap();
    assert_eq!((bias.numerator, bias.denominator), (1, 2));

    let by_model = report
        .task_breakdown(Task::Classify, GroupKey::Model)
        .unwrap();
    assert_eq!(by_model.groups[0].group, "GPT-4o");
    assert_eq!(by_model.groups[0].count, 3);
    assert_eq!(by_model.count("DeepSeek-R1"), 1);

    let summary = report.render_summary().unwrap();
    assert!(summary.contains("Potemkin rate conditioned on keystone success:"));
    assert!(summary.contains("  Generate: 50.00%"));
}

#[test]
fn substitute_catalog_changes_enumeration() {
    let temp = benchmark_tree();
    let catalog = Catalog::new(
        DomainClassifier::new(
            LabelSet::new(["Confirmation Bias"]),
            LabelSet::new(Vec::<&str>::new()),
            LabelSet::new(["Haiku", "Stag Hunt"]),
        ),
        ModelCanonicalizer::new([("gpt-4o", "GPT-4o")]),
    );
    let layout = BenchmarkLayout::new(temp.path());
    let source = GenerateSource::from_layout(&layout, Arc::new(catalog));
    let records = collect(&source);
    // Without game-theory labels Stag Hunt moves to the label-table branch,
    // where its row points at the bundle written for enumeration.
    let hunt: Vec<&Record> = records.iter().filter(|r| r.concept == "Stag Hunt").collect();
    assert_eq!(hunt.len(), 1);
    assert_eq!(hunt[0].correct, Correctness::No);
    assert_eq!(hunt[0].domain, Domain::LiteraryTechniques);
}

#[test]
fn unrecognized_bundle_correctness_aborts_aggregation() {
    let temp = benchmark_tree();
    write(
        temp.path().join("edit/inferences/Stag Hunt/GPT-4o/0.json"),
        &json!({"correct": "maybe", "inferences": "x"}).to_string(),
    );
    let report = PotemkinReport::from_config(&BenchmarkConfig::new(temp.path()));
    let err = report.by_task().unwrap_err();
    assert!(matches!(err, PotemkinError::UnrecognizedCorrectness { .. }));
    assert!(report.keystone_index().is_ok());
}
