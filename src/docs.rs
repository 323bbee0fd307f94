//! Static OpenAPI description of the HTTP surface, served at `/docs.json`.

use serde_json::{json, Value};

pub fn api_document() -> Value {
    let record = json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer" },
            "text": { "type": "string" },
            "sentiment": { "type": "string" },
            "tipe": { "type": "string", "enum": ["NN", "LSTM"] }
        }
    });
    let manual = json!({
        "type": "object",
        "properties": {
            "input": { "type": "string" },
            "output": { "type": "string" }
        }
    });
    let rows = json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "text": { "type": "string" },
                "sentiment": { "type": "string" }
            }
        }
    });

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "API Documentation for Data Processing and Modeling",
            "version": "1.0.0",
            "description": "Sentiment prediction with a bag-of-words neural network and an LSTM model"
        },
        "paths": {
            "/delete_all": {
                "get": {
                    "summary": "Delete every logged prediction",
                    "responses": { "200": { "description": "Delete process is success" } }
                }
            },
            "/get_all": {
                "get": {
                    "summary": "List logged predictions",
                    "responses": { "200": json_response("Logged predictions", json!({ "type": "array", "items": record })) }
                }
            },
            "/post_neural_network": {
                "post": form_operation("Classify one text with the neural network", "manual_input_neural_network", &manual)
            },
            "/upload_neural_network": {
                "post": upload_operation("Classify a CSV `text` column with the neural network", &rows)
            },
            "/post_lstm": {
                "post": form_operation("Classify one text with the LSTM model", "post_lstm", &manual)
            },
            "/upload_lstm": {
                "post": upload_operation("Classify a CSV `text` column with the LSTM model", &rows)
            }
        }
    })
}

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

fn form_operation(summary: &str, field: &str, response: &Value) -> Value {
    json!({
        "summary": summary,
        "requestBody": {
            "required": true,
            "content": {
                "application/x-www-form-urlencoded": {
                    "schema": {
                        "type": "object",
                        "required": [field],
                        "properties": { field: { "type": "string" } }
                    }
                }
            }
        },
        "responses": {
            "200": json_response("Prediction", response.clone()),
            "400": { "description": "Missing form field" }
        }
    })
}

fn upload_operation(summary: &str, response: &Value) -> Value {
    json!({
        "summary": summary,
        "requestBody": {
            "required": true,
            "content": {
                "multipart/form-data": {
                    "schema": {
                        "type": "object",
                        "required": ["file"],
                        "properties": { "file": { "type": "string", "format": "binary" } }
                    }
                }
            }
        },
        "responses": {
            "200": json_response("Prediction per row", response.clone()),
            "400": { "description": "Missing file or `text` column" }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_json_route() {
        let doc = api_document();
        let paths = doc["paths"].as_object().unwrap();
        for route in [
            "/delete_all",
            "/get_all",
            "/post_neural_network",
            "/upload_neural_network",
            "/post_lstm",
            "/upload_lstm",
        ] {
            assert!(paths.contains_key(route), "missing {route}");
        }
    }

    #[test]
    fn form_field_names_match_handlers() {
        let doc = api_document();
        let schema = &doc["paths"]["/post_lstm"]["post"]["requestBody"]["content"]
            ["application/x-www-form-urlencoded"]["schema"];
        assert_eq!(schema["required"][0], "post_lstm");
        assert!(schema["properties"]["post_lstm"].is_object());
    }
}
