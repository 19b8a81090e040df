use super::{RenderError, Report};

pub(super) fn render(report: &Report) -> Result<String, RenderError> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_batch;
    use serde_json::Value;

    #[test]
    fn test_json_shape() {
        let batch = sample_batch();
        let json = render(&Report::new("Report", &batch)).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "Report");
        assert!(value["generated_at"].is_string());
        assert_eq!(value["unmatched_old"], serde_json::json!(["gone.xml"]));
        assert_eq!(value["unmatched_new"], serde_json::json!(["fresh.xml"]));

        let files = value["files"].as_array().unwrap();
        assert_eq!(files.len(), 3);
        assert_eq!(files[0]["status"], "failed");
        assert_eq!(files[0]["name"], "bad.xml");

        let store = &files[2];
        assert_eq!(store["status"], "compared");
        assert_eq!(store["name"], "store.xml");
        assert_eq!(store["stats"]["removed"], 1);
        assert_eq!(store["summary"], Value::Null);

        let page = &store["pages"][0];
        assert_eq!(page["number"], 1);
        assert_eq!(page["header"], serde_json::json!(["OLD VERSION", "NEW VERSION"]));
        assert_eq!(page["rows"][1]["origin"], "removed");
        assert_eq!(page["rows"][1]["new"], "");
        assert_eq!(page["rows"][2]["origin"], "added");
    }
}
