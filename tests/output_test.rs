//! Output format tests

mod common;

use common::StubTokenizer;
use openchj::output::{csv_escape, csv_unescape, COLUMNS};
use openchj::{AnnotatedToken, Annotator, CorpusWriter, OutputFormat, SentenceBoundary};

fn annotate(text: &str) -> Vec<AnnotatedToken> {
    Annotator::default().analyze(&StubTokenizer, text).unwrap()
}

#[test]
fn test_tsv_rows() {
    let writer = CorpusWriter::new("corpus/源氏物語.txt", "");
    let tsv = writer.to_tsv(&annotate("今日は"));

    assert!(tsv.ends_with('\n'));
    for line in tsv.lines() {
        assert_eq!(line.split('\t').count(), COLUMNS.len());
    }

    insta::assert_snapshot!(tsv.trim_end().replace('\t', "|"), @r"
    源氏物語|-|10|30|B|今日|今日|キョウ|名詞-普通名詞-副詞可能|||キョー|和
    源氏物語|-|30|40|I|は|は|ハ|助詞-係助詞|||ワ|和
    ");
}

#[test]
fn test_json_rows() {
    let writer = CorpusWriter::new("源氏物語.txt", "平安");
    let json = writer.to_json(&annotate("今日")).unwrap();

    insta::assert_snapshot!(json.trim_end(), @r#"
    [
      {
        "file_name": "源氏物語",
        "subcorpus_name": "平安",
        "start_position": 10,
        "end_position": 30,
        "sentence_boundary": "B",
        "surface_form": "今日",
        "lexeme": "今日",
        "lexeme_reading": "キョウ",
        "pos": "名詞-普通名詞-副詞可能",
        "conjugation_type": "",
        "conjugation_form": "",
        "pronunciation": "キョー",
        "word_type": "和"
      }
    ]
    "#);
}

#[test]
fn test_json_parses_back_with_column_keys() {
    let writer = CorpusWriter::new("a.txt", "");
    let json = writer.to_json(&annotate("明日は晴れ")).unwrap();

    let rows: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
    assert_eq!(rows.len(), 3);
    for row in &rows {
        let object = row.as_object().unwrap();
        assert_eq!(object.len(), COLUMNS.len());
        for column in COLUMNS {
            assert!(object.contains_key(column), "missing {}", column);
        }
    }
    assert_eq!(rows[1]["sentence_boundary"], "I");
}

#[test]
fn test_csv_comma_cell_round_trip() {
    let token = AnnotatedToken {
        start_position: 10,
        end_position: 20,
        sentence_boundary: SentenceBoundary::Begin,
        surface_form: ",".to_string(),
        lexeme: ",".to_string(),
        lexeme_reading: String::new(),
        pos: "補助記号-読点".to_string(),
        conjugation_type: String::new(),
        conjugation_form: String::new(),
        pronunciation: String::new(),
        word_type: "記号".to_string(),
    };

    let csv = CorpusWriter::new("x.txt", "").to_csv(&[token]);
    assert_eq!(csv, "x,-,10,20,B,\",\",\",\",,補助記号-読点,,,,記号\n");

    let quoted = csv_escape("\"a\",b");
    assert_eq!(csv_unescape(&quoted), "\"a\",b");
}

#[test]
fn test_render_dispatches_on_format() {
    let tokens = annotate("今日");
    let writer = CorpusWriter::new("a.txt", "");

    assert_eq!(writer.render(OutputFormat::Tsv, &tokens).unwrap(), writer.to_tsv(&tokens));
    assert_eq!(writer.render(OutputFormat::Csv, &tokens).unwrap(), writer.to_csv(&tokens));
    assert!(writer
        .render(OutputFormat::Json, &tokens)
        .unwrap()
        .starts_with('['));
}

#[test]
fn test_output_format_parsing() {
    assert_eq!("TSV".parse::<OutputFormat>(), Ok(OutputFormat::Tsv));
    assert_eq!("txt".parse::<OutputFormat>(), Ok(OutputFormat::Tsv));
    assert_eq!(" json ".parse::<OutputFormat>(), Ok(OutputFormat::Json));
    assert!("xlsx".parse::<OutputFormat>().is_err());
    assert_eq!(OutputFormat::Csv.extension(), ".csv");
    assert_eq!(OutputFormat::Tsv.extension(), ".txt");
}
