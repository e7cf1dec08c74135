// Wire format of the forms API, and its translation to the scoring types.

use std::collections::HashMap;

use award_scoring::{FormDefinition, FormRequest, Item, NewItem, Response, ScoringErrors, SubQuestion};
use serde::{Deserialize, Serialize};

use crate::forms::gateway::RemoteForm;
use crate::forms::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfoJs {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormJs {
    #[serde(rename = "formId")]
    pub form_id: String,
    #[serde(default)]
    pub info: InfoJs,
    #[serde(rename = "responderUri")]
    pub responder_uri: Option<String>,
    #[serde(rename = "revisionId")]
    pub revision_id: Option<String>,
    // Absent until the first question is added.
    #[serde(default)]
    pub items: Vec<ItemJs>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemJs {
    #[serde(rename = "itemId", default)]
    pub item_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "questionItem")]
    pub question_item: Option<QuestionItemJs>,
    #[serde(rename = "questionGroupItem")]
    pub question_group_item: Option<QuestionGroupItemJs>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionItemJs {
    pub question: QuestionJs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionGroupItemJs {
    #[serde(default)]
    pub questions: Vec<QuestionJs>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionJs {
    #[serde(rename = "questionId")]
    pub question_id: String,
    #[serde(rename = "rowQuestion")]
    pub row_question: Option<RowQuestionJs>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowQuestionJs {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesPageJs {
    // Absent when nobody answered.
    #[serde(default)]
    pub responses: Vec<ResponseJs>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseJs {
    #[serde(rename = "responseId", default)]
    pub response_id: String,
    #[serde(default)]
    pub answers: HashMap<String, AnswerJs>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerJs {
    #[serde(rename = "textAnswers")]
    pub text_answers: Option<TextAnswersJs>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextAnswersJs {
    #[serde(default)]
    pub answers: Vec<TextAnswerJs>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextAnswerJs {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListJs {
    #[serde(default)]
    pub files: Vec<FileJs>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileJs {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetValuesJs {
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

/// Translates a form. Items that are not questions (text, images, page
/// breaks) are dropped. Items with an unexpected structure are logged and dropped.
pub fn remote_form_from_js(form: FormJs) -> RemoteForm {
    let mut items: Vec<Item> = Vec::new();
    for item_js in form.items.iter() {
        match item_from_js(item_js) {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {
                debug!(
                    "form {}: item {} is not a question, skipping",
                    form.form_id, item_js.item_id
                );
            }
            Err(e) => {
                warn!("form {}: skipping item: {}", form.form_id, e);
            }
        }
    }
    RemoteForm {
        form_id: form.form_id,
        title: form.info.title,
        responder_uri: form.responder_uri,
        revision_id: form.revision_id,
        definition: FormDefinition { items },
    }
}

fn item_from_js(item: &ItemJs) -> Result<Option<Item>, ScoringErrors> {
    match (&item.question_item, &item.question_group_item) {
        (None, None) => Ok(None),
        (Some(q), None) => Ok(Some(Item::Single {
            item_id: item.item_id.clone(),
            title: item.title.clone(),
            question_id: q.question.question_id.clone(),
        })),
        (None, Some(group)) => {
            let mut sub_questions: Vec<SubQuestion> = Vec::new();
            for q in group.questions.iter() {
                let row = q
                    .row_question
                    .as_ref()
                    .ok_or_else(|| ScoringErrors::SchemaMismatch {
                        item_id: item.item_id.clone(),
                        reason: format!("question {} is not a grid row", q.question_id),
                    })?;
                sub_questions.push(SubQuestion {
                    question_id: q.question_id.clone(),
                    row_title: row.title.clone(),
                });
            }
            Ok(Some(Item::Grid {
                item_id: item.item_id.clone(),
                title: item.title.clone(),
                sub_questions,
            }))
        }
        (Some(_), Some(_)) => Err(ScoringErrors::SchemaMismatch {
            item_id: item.item_id.clone(),
            reason: "item is both a question and a question group".to_string(),
        }),
    }
}

/// Keeps the text answers of a response. Answers without text (file uploads)
/// are kept as an empty list, which counts as unanswered.
pub fn response_from_js(response: ResponseJs) -> Response {
    let answers: HashMap<String, Vec<String>> = response
        .answers
        .into_iter()
        .map(|(qid, answer)| {
            let values: Vec<String> = answer
                .text_answers
                .map(|ta| ta.answers.into_iter().map(|a| a.value).collect())
                .unwrap_or_default();
            (qid, values)
        })
        .collect();
    Response {
        response_id: response.response_id,
        answers,
    }
}

fn new_item_js(item: &NewItem) -> JSValue {
    match item {
        NewItem::Grid {
            title,
            rows,
            columns,
        } => {
            let questions: Vec<JSValue> = rows
                .iter()
                .map(|r| json!({"rowQuestion": {"title": r}}))
                .collect();
            let options: Vec<JSValue> = columns.iter().map(|c| json!({ "value": c })).collect();
            json!({
                "title": title,
                "questionGroupItem": {
                    "questions": questions,
                    "grid": {"columns": {"type": "RADIO", "options": options}}
                }
            })
        }
        NewItem::Dropdown { title, options } => {
            let options: Vec<JSValue> = options.iter().map(|o| json!({ "value": o })).collect();
            json!({
                "title": title,
                "questionItem": {
                    "question": {
                        "required": false,
                        "choiceQuestion": {"type": "DROP_DOWN", "options": options}
                    }
                }
            })
        }
        NewItem::Text { title } => json!({
            "title": title,
            "questionItem": {
                "question": {"required": false, "textQuestion": {"paragraph": false}}
            }
        }),
    }
}

pub fn request_js(request: &FormRequest) -> JSValue {
    match request {
        FormRequest::UpdateTitle { title } => json!({
            "updateFormInfo": {"info": {"title": title}, "updateMask": "title"}
        }),
        FormRequest::CreateItem { index, item } => json!({
            "createItem": {"item": new_item_js(item), "location": {"index": index}}
        }),
    }
}

pub fn batch_update_js(requests: &[FormRequest]) -> JSValue {
    let requests: Vec<JSValue> = requests.iter().map(request_js).collect();
    json!({ "requests": requests })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"{
        "formId": "form-1",
        "info": {"title": "Achievement in Science", "documentTitle": "Science document"},
        "responderUri": "https://example.com/viewform",
        "revisionId": "00000042",
        "items": [
            {"itemId": "i1", "title": "Alice",
             "questionGroupItem": {
                "questions": [
                    {"questionId": "a1", "rowQuestion": {"title": "Impact"}},
                    {"questionId": "a2", "rowQuestion": {"title": "Clarity"}}
                ],
                "grid": {"columns": {"type": "RADIO", "options": [{"value": "1"}]}}}},
            {"itemId": "i2", "title": "Some instructions", "textItem": {}},
            {"itemId": "i3", "title": "Broken",
             "questionGroupItem": {"questions": [{"questionId": "x1"}]}},
            {"itemId": "i4", "title": "Judge Name",
             "questionItem": {"question": {"questionId": "j1", "textQuestion": {}}}}
        ]
    }"#;

    #[test]
    fn reads_a_form() {
        let js: FormJs = serde_json::from_str(FORM).unwrap();
        let form = remote_form_from_js(js);
        assert_eq!(form.form_id, "form-1");
        assert_eq!(form.title, "Achievement in Science");
        assert_eq!(form.responder_uri, Some("https://example.com/viewform".to_string()));
        assert_eq!(form.revision_id.as_deref(), Some("00000042"));
        assert_eq!(
            form.definition.items,
            vec![
                Item::Grid {
                    item_id: "i1".to_string(),
                    title: "Alice".to_string(),
                    sub_questions: vec![
                        SubQuestion {
                            question_id: "a1".to_string(),
                            row_title: "Impact".to_string()
                        },
                        SubQuestion {
                            question_id: "a2".to_string(),
                            row_title: "Clarity".to_string()
                        },
                    ],
                },
                Item::Single {
                    item_id: "i4".to_string(),
                    title: "Judge Name".to_string(),
                    question_id: "j1".to_string(),
                },
            ]
        );
    }

    #[test]
    fn form_without_questions() {
        let js: FormJs =
            serde_json::from_str(r#"{"formId": "f", "info": {"title": "Empty Form"}}"#).unwrap();
        let form = remote_form_from_js(js);
        assert!(form.definition.items.is_empty());
    }

    #[test]
    fn reads_responses() {
        let page: ResponsesPageJs = serde_json::from_str(
            r#"{"responses": [{"responseId": "r1", "answers": {
                "a1": {"questionId": "a1", "textAnswers": {"answers": [{"value": "8"}, {"value": "9"}]}},
                "f1": {"questionId": "f1", "fileUploadAnswers": {"answers": []}}
            }}]}"#,
        )
        .unwrap();
        let responses: Vec<Response> = page.responses.into_iter().map(response_from_js).collect();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].response_id, "r1");
        assert_eq!(responses[0].answers["a1"], vec!["8", "9"]);
        assert!(responses[0].answers["f1"].is_empty());
    }

    #[test]
    fn no_responses_yet() {
        let page: ResponsesPageJs = serde_json::from_str("{}").unwrap();
        assert!(page.responses.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn reads_a_file_list_page() {
        let page: FileListJs = serde_json::from_str(
            r#"{"nextPageToken": "p2", "files": [
                {"id": "f1", "name": "Project"},
                {"id": "f2"}
            ]}"#,
        )
        .unwrap();
        let ids: Vec<String> = page.files.into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["f1", "f2"]);
        assert_eq!(page.next_page_token.as_deref(), Some("p2"));
    }

    #[test]
    fn serializes_requests() {
        let requests = vec![
            FormRequest::UpdateTitle {
                title: "Project".to_string(),
            },
            FormRequest::CreateItem {
                index: 0,
                item: NewItem::Grid {
                    title: "Alice".to_string(),
                    rows: vec!["Impact".to_string()],
                    columns: vec!["1".to_string(), "2".to_string()],
                },
            },
            FormRequest::CreateItem {
                index: 1,
                item: NewItem::Text {
                    title: "Judge Name".to_string(),
                },
            },
        ];
        let js = batch_update_js(&requests);
        assert_eq!(
            js["requests"][0],
            json!({"updateFormInfo": {"info": {"title": "Project"}, "updateMask": "title"}})
        );
        assert_eq!(
            js["requests"][1]["createItem"]["item"]["questionGroupItem"]["questions"],
            json!([{"rowQuestion": {"title": "Impact"}}])
        );
        assert_eq!(
            js["requests"][1]["createItem"]["item"]["questionGroupItem"]["grid"]["columns"]["options"],
            json!([{"value": "1"}, {"value": "2"}])
        );
        assert_eq!(js["requests"][2]["createItem"]["location"]["index"], json!(1));
        assert_eq!(
            js["requests"][2]["createItem"]["item"]["title"],
            json!("Judge Name")
        );
    }
}
