//! Tests for verdict parsing and result persistence

#[cfg(test)]
mod tests {
    use dermalens::classify::result::{
        Classification, ClassificationResult, Verdict, parse_verdict,
    };
    use dermalens::classify::sampler::SampledExamples;
    use std::path::{Path, PathBuf};

    // Tests a bare JSON reply parses into the verdict
    // Verified by renaming the answer field
    #[test]
    fn test_parse_bare_json() {
        let verdict =
            match parse_verdict(r#"{"thoughts":"looks asymmetric","answer":"Melanoma"}"#) {
                Ok(verdict) => verdict,
                Err(e) => unreachable!("Expected a parseable reply: {e}"),
            };
        assert_eq!(verdict.answer, Classification::Melanoma);
        assert_eq!(verdict.thoughts, "looks asymmetric");
    }

    // Tests a fenced reply still yields the embedded object
    // Verified by removing the brace-extraction fallback
    #[test]
    fn test_parse_fenced_json() {
        let reply = "```json\n{\"thoughts\":\"t\",\"answer\":\"Benign\"}\n```";
        let verdict = match parse_verdict(reply) {
            Ok(verdict) => verdict,
            Err(e) => unreachable!("Expected the fenced object to parse: {e}"),
        };
        assert_eq!(verdict.answer, Classification::Benign);
    }

    // Tests the thoughts field is optional
    #[test]
    fn test_parse_missing_thoughts_defaults_empty() {
        let verdict = match parse_verdict(r#"{"answer":"Benign"}"#) {
            Ok(verdict) => verdict,
            Err(e) => unreachable!("Expected a parseable reply: {e}"),
        };
        assert!(verdict.thoughts.is_empty());
    }

    // Tests replies without an answer field are rejected
    // Verified by defaulting the answer to Benign
    #[test]
    fn test_parse_missing_answer_fails() {
        assert!(parse_verdict(r#"{"thoughts":"no verdict"}"#).is_err());
    }

    // Tests labels outside the binary set are rejected
    #[test]
    fn test_parse_unknown_label_fails() {
        assert!(parse_verdict(r#"{"answer":"Suspicious"}"#).is_err());
    }

    // Tests non-JSON replies are rejected with a malformed response error
    #[test]
    fn test_parse_prose_without_object_fails() {
        assert!(parse_verdict("I am sorry, I cannot help with that.").is_err());
    }

    // Tests the round trip: a saved result reloads with the same answer and
    // the same example path lists used to build the prompt
    // Verified by dropping the example fields from serialization
    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir failed: {e}"));
        let examples = SampledExamples {
            negative: vec![PathBuf::from("neg/a.jpg"), PathBuf::from("neg/b.jpg")],
            positive: vec![PathBuf::from("pos/c.jpg"), PathBuf::from("pos/d.jpg")],
        };
        let verdict = Verdict {
            thoughts: "irregular border".to_string(),
            answer: Classification::Melanoma,
        };

        let result = ClassificationResult::new(verdict, &examples);
        let saved = match result.save(dir.path(), Path::new("queries/query1.jpg")) {
            Ok(path) => path,
            Err(e) => unreachable!("Expected the result to save: {e}"),
        };
        assert_eq!(saved.file_name().and_then(|n| n.to_str()), Some("query1.json"));

        let reloaded = match ClassificationResult::load(&saved) {
            Ok(result) => result,
            Err(e) => unreachable!("Expected the result to reload: {e}"),
        };
        assert_eq!(reloaded.answer, Classification::Melanoma);
        assert_eq!(reloaded.neg_examples, result.neg_examples);
        assert_eq!(reloaded.pos_examples, result.pos_examples);
        assert_eq!(reloaded.thoughts, "irregular border");
    }

    // Tests the CSV-facing label text
    #[test]
    fn test_classification_labels() {
        assert_eq!(Classification::Melanoma.as_str(), "Melanoma");
        assert_eq!(Classification::Benign.as_str(), "Benign");
    }
}
