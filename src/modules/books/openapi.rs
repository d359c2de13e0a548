use serde_json::{json, Value};

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

fn error_response(description: &str) -> Value {
    json_response(
        description,
        json!({ "$ref": "#/components/schemas/ErrorResponse" }),
    )
}

fn book_ref() -> Value {
    json!({ "$ref": "#/components/schemas/Book" })
}

fn id_parameter() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": "Book identifier",
        "schema": { "type": "integer", "format": "int32" }
    })
}

fn payload_body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": format!("#/components/schemas/{}", schema) }
            }
        }
    })
}

fn text_property(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

/// OpenAPI fragment for the books module, paths relative to its mount point.
pub fn document() -> Value {
    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "responses": {
                        "200": json_response("All books", json!({ "type": "array", "items": book_ref() })),
                        "500": error_response("Storage failure")
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": payload_body("NewBook"),
                    "responses": {
                        "201": json_response("Created book", book_ref()),
                        "400": error_response("Invalid JSON or missing required fields"),
                        "500": error_response("Storage failure, including duplicate ISBN")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": json_response("The book", book_ref()),
                        "400": error_response("Invalid book ID"),
                        "404": error_response("Book not found")
                    }
                },
                "put": {
                    "summary": "Update a book",
                    "description": "Empty strings and a zero year keep the stored value.",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "requestBody": payload_body("BookPatch"),
                    "responses": {
                        "200": json_response("Merged book", book_ref()),
                        "400": error_response("Invalid book ID or JSON"),
                        "404": error_response("Book not found"),
                        "500": error_response("Storage failure")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "204": { "description": "Deleted" },
                        "400": error_response("Invalid book ID"),
                        "404": error_response("Book not found")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int32" },
                        "title": text_property("Title of the book"),
                        "author": text_property("Author of the book"),
                        "isbn": text_property("Unique ISBN"),
                        "year": { "type": "integer", "format": "int32" }
                    },
                    "required": ["id", "title", "author", "isbn", "year"]
                },
                "NewBook": {
                    "type": "object",
                    "properties": {
                        "title": text_property("Title of the book"),
                        "author": text_property("Author of the book"),
                        "isbn": text_property("Unique ISBN"),
                        "year": { "type": "integer", "format": "int32" }
                    },
                    "required": ["title", "author", "isbn"]
                },
                "BookPatch": {
                    "type": "object",
                    "properties": {
                        "title": text_property("New title, empty to keep"),
                        "author": text_property("New author, empty to keep"),
                        "isbn": text_property("New ISBN, empty to keep"),
                        "year": { "type": "integer", "format": "int32" }
                    }
                }
            }
        }
    })
}
