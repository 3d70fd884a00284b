use mergetok::BpeError;
use mergetok::corpus::InMemoryTextSource;
use mergetok::tokenizer::{BpeTokenizer, Tokenizer};
use mergetok::training::{MergeStrategy, TrainResults, TrainerOptions};
use mergetok::types::WordCountMap;
use mergetok::vocab::{load_vocab_from_path, save_vocab_to_path};

fn train_with(
    items: &[&str],
    options: TrainerOptions,
) -> BpeTokenizer<u32> {
    let source = InMemoryTextSource::new(items.iter().copied()).with_train_ratio(1.0);
    BpeTokenizer::train(&source, options).unwrap()
}

fn train(
    items: &[&str],
    num_merges: usize,
) -> BpeTokenizer<u32> {
    train_with(items, TrainerOptions::default().with_num_merges(num_merges))
}

fn strategies() -> [MergeStrategy; 2] {
    [MergeStrategy::Indexed, MergeStrategy::Rescan]
}

#[test]
fn test_postfix_merges() {
    for strategy in strategies() {
        let tokenizer = train_with(
            &["fake cake", "fake fake cake"],
            TrainerOptions::default()
                .with_num_merges(3)
                .with_strategy(strategy),
        );
        assert_eq!(
            tokenizer.tokenize("fake cake").unwrap(),
            vec!["f", "ake</w>", "c", "ake</w>"]
        );
    }
}

#[test]
fn test_prefix_merge() {
    for strategy in strategies() {
        let tokenizer = train_with(
            &["nike night"],
            TrainerOptions::default()
                .with_num_merges(1)
                .with_strategy(strategy),
        );
        assert_eq!(
            tokenizer.tokenize("nike night").unwrap(),
            vec!["ni", "k", "e", "</w>", "ni", "g", "h", "t", "</w>"]
        );
    }
}

#[test]
fn test_middle_merge() {
    for strategy in strategies() {
        let tokenizer = train_with(
            &["wait and gain"],
            TrainerOptions::default()
                .with_num_merges(1)
                .with_strategy(strategy),
        );
        assert_eq!(
            tokenizer.tokenize("wait and gain").unwrap(),
            vec![
                "w", "ai", "t", "</w>", "a", "n", "d", "</w>", "g", "ai", "n", "</w>"
            ]
        );
    }
}

#[test]
fn test_round_trip() {
    let corpus = [
        "the quick brown fox jumps over the lazy dog",
        "the lazy dog sleeps",
        "a quick brown dog jumps",
    ];
    for num_merges in [0, 5, 50, 1000] {
        let tokenizer = train(&corpus, num_merges);
        for text in ["the dog jumps", "  lazy   fox\tsleeps \n", "over"] {
            let ids = tokenizer.encode(text).unwrap();
            let expected = text.split_whitespace().collect::<Vec<_>>().join(" ");
            assert_eq!(tokenizer.decode(&ids).unwrap(), expected);
        }
    }
}

#[test]
fn test_id_bijection() {
    let tokenizer = train(&["low lower lowest", "newer wider new"], 12);
    let vocab = tokenizer.vocab();

    for (idx, token) in vocab.tokens().enumerate() {
        let id = vocab.token_to_id(token).unwrap();
        assert_eq!(id as usize, idx);
        assert_eq!(vocab.id_to_token(id).unwrap(), token);
    }

    let tokens: Vec<_> = vocab.tokens().collect();
    assert!(tokens.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_persistence_is_idempotent() {
    let tokenizer = train(&["low lower lowest", "newer wider new"], 12);
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.tsv");
    let second = dir.path().join("nested").join("second.tsv");

    tokenizer.save(&first).unwrap();
    let loaded = load_vocab_from_path::<u32, _>(&first).unwrap();
    assert_eq!(&loaded, tokenizer.vocab());

    save_vocab_to_path(&loaded, &second).unwrap();
    assert_eq!(
        std::fs::read_to_string(&first).unwrap(),
        std::fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn test_zero_merges_keeps_characters() {
    let tokenizer = train(&["low lower"], 0);
    let vocab = tokenizer.vocab();

    assert_eq!(
        vocab.tokens().collect::<Vec<_>>(),
        vec!["</w>", "e", "l", "o", "r", "w"]
    );
    assert_eq!(vocab.frequency("</w>"), Some(2));
    assert_eq!(vocab.frequency("l"), Some(2));
    assert_eq!(vocab.frequency("e"), Some(1));
    assert_eq!(
        tokenizer.tokenize("low").unwrap(),
        vec!["l", "o", "w", "</w>"]
    );
}

#[test]
fn test_single_symbol_words_never_merge() {
    let mut word_counts: WordCountMap = Default::default();
    word_counts.insert("a</w>".to_string(), 2);
    word_counts.insert("b</w>".to_string(), 1);

    for strategy in strategies() {
        let TrainResults::<u32> { vocab, merges, .. } = TrainerOptions::default()
            .with_num_merges(100)
            .with_strategy(strategy)
            .train_vocab_from_word_counts(&word_counts)
            .unwrap();

        assert!(merges.is_empty());
        assert_eq!(vocab.tokens().collect::<Vec<_>>(), vec!["a</w>", "b</w>"]);
        assert_eq!(vocab.frequency("a</w>"), Some(2));
    }
}

#[test]
fn test_single_character_words_merge_with_marker() {
    let source = InMemoryTextSource::new(["a b a"]).with_train_ratio(1.0);
    for strategy in strategies() {
        let TrainResults::<u32> { vocab, merges, .. } = TrainerOptions::default()
            .with_num_merges(100)
            .with_strategy(strategy)
            .train_vocab_from_source(&source)
            .unwrap();

        let merged: Vec<_> = merges.iter().map(|r| r.merged.as_str()).collect();
        assert_eq!(merged, vec!["a</w>", "b</w>"]);
        assert_eq!(vocab.tokens().collect::<Vec<_>>(), vec!["a</w>", "b</w>"]);
        assert_eq!(vocab.frequency("a</w>"), Some(2));
    }
}

#[test]
fn test_seen_characters_new_arrangement() {
    let tokenizer = train(&["ab"], 10);
    assert_eq!(tokenizer.vocab().tokens().collect::<Vec<_>>(), vec!["ab</w>"]);
    assert_eq!(tokenizer.decode(&tokenizer.encode("ab").unwrap()).unwrap(), "ab");

    // Both characters were seen, but neither survives as a token by itself.
    match tokenizer.encode("ba") {
        Err(BpeError::UnsegmentableWord { word, symbol }) => {
            assert_eq!(word, "ba");
            assert_eq!(symbol, "b");
        }
        other => panic!("expected UnsegmentableWord, got {other:?}"),
    }
}

#[test]
fn test_unseen_character() {
    let tokenizer = train(&["fake cake"], 3);
    match tokenizer.encode("fake zebra") {
        Err(BpeError::UnsegmentableWord { word, symbol }) => {
            assert_eq!(word, "zebra");
            assert_eq!(symbol, "z");
        }
        other => panic!("expected UnsegmentableWord, got {other:?}"),
    }
}

#[test]
fn test_unknown_id() {
    let tokenizer = train(&["fake cake"], 3);
    let n = tokenizer.vocab().len() as u32;
    assert!(matches!(
        tokenizer.decode(&[0, n]),
        Err(BpeError::UnknownTokenId(id)) if id == n as u64
    ));
}
