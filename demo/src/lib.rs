//! A todo list API.
//!
//! Every route shares one [`Database`], handed to the handlers when the
//! router is built.

use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use meridian::extract::{self, JsonBody, OptionalQuery, UrlParameter};
use meridian::http::StatusCode;
use meridian::route::Matcher;
use meridian::{async_trait, Handler, Json, NotFound, Router, Scope};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

meridian::parameter_key!(pub TodoId => "id": String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub order: Option<i64>,
}

/// Changes to apply to a [`Todo`]. Missing fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub order: Option<i64>,
}

impl TodoPatch {
    fn apply(self, todo: &mut Todo) {
        if let Some(title) = self.title {
            todo.title = title;
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(order) = self.order {
            todo.order = Some(order);
        }
    }
}

/// In-memory todo storage.
#[derive(Debug, Clone, Default)]
pub struct Database {
    todos: Arc<Mutex<Vec<Todo>>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of every todo.
    pub fn todos(&self) -> Vec<Todo> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Todo>> {
        self.todos.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Build the todo API under `prefix`.
///
/// The collection is served at the prefix with or without a trailing
/// slash, so `--prefix /` serves it at `/`.
pub fn router(db: Database, prefix: &str) -> Router {
    let collection = || Matcher::first_of([Matcher::root(), Matcher::path("/")]);

    Router::new().scope(
        Scope::new(prefix)
            .get(collection(), ListTodos { db: db.clone() })
            .delete(collection(), ClearTodos { db: db.clone() })
            .post(collection(), CreateTodo { db: db.clone() })
            .get("/{id}", ShowTodo { db: db.clone() })
            .patch("/{id}", EditTodo { db: db.clone() })
            .delete("/{id}", DeleteTodo { db }),
    )
}

pub struct ListTodos {
    db: Database,
}

#[async_trait]
impl Handler for ListTodos {
    type Inputs = (OptionalQuery<bool>,);
    type Response = Json<Vec<Todo>>;
    type Rejection = Infallible;

    fn inputs(&self) -> Self::Inputs {
        (extract::query("completed").optional(),)
    }

    async fn call(&self, inputs: (Option<bool>,)) -> Result<Json<Vec<Todo>>, Infallible> {
        let (completed,) = inputs;

        let todos = self
            .db
            .lock()
            .iter()
            .filter(|todo| completed.map_or(true, |completed| todo.completed == completed))
            .cloned()
            .collect();

        Ok(Json(todos))
    }
}

pub struct ClearTodos {
    db: Database,
}

#[async_trait]
impl Handler for ClearTodos {
    type Inputs = ();
    type Response = Json<Vec<Todo>>;
    type Rejection = Infallible;

    fn inputs(&self) -> Self::Inputs {}

    async fn call(&self, _: ()) -> Result<Json<Vec<Todo>>, Infallible> {
        let mut todos = self.db.lock();
        tracing::info!(count = todos.len(), "clearing todos");
        todos.clear();

        Ok(Json(Vec::new()))
    }
}

pub struct CreateTodo {
    db: Database,
}

#[async_trait]
impl Handler for CreateTodo {
    type Inputs = (JsonBody<Todo>,);
    type Response = (StatusCode, Json<Todo>);
    type Rejection = Infallible;

    fn inputs(&self) -> Self::Inputs {
        (extract::json(),)
    }

    async fn call(&self, inputs: (Todo,)) -> Result<(StatusCode, Json<Todo>), Infallible> {
        let (todo,) = inputs;
        tracing::debug!(id = %todo.id, "creating todo");

        self.db.lock().push(todo.clone());
        Ok((StatusCode::CREATED, Json(todo)))
    }
}

pub struct ShowTodo {
    db: Database,
}

#[async_trait]
impl Handler for ShowTodo {
    type Inputs = (UrlParameter<TodoId>,);
    type Response = Json<Todo>;
    type Rejection = NotFound;

    fn inputs(&self) -> Self::Inputs {
        (extract::url_param(),)
    }

    async fn call(&self, inputs: (String,)) -> Result<Json<Todo>, NotFound> {
        let (id,) = inputs;

        self.db
            .lock()
            .iter()
            .find(|todo| todo.id.to_string() == id)
            .cloned()
            .map(Json)
            .ok_or_else(NotFound::new)
    }
}

pub struct EditTodo {
    db: Database,
}

#[async_trait]
impl Handler for EditTodo {
    type Inputs = (UrlParameter<TodoId>, JsonBody<TodoPatch>);
    type Response = Json<Todo>;
    type Rejection = NotFound;

    fn inputs(&self) -> Self::Inputs {
        (extract::url_param(), extract::json())
    }

    async fn call(&self, inputs: (String, TodoPatch)) -> Result<Json<Todo>, NotFound> {
        let (id, patch) = inputs;

        let mut todos = self.db.lock();
        let todo = todos
            .iter_mut()
            .find(|todo| todo.id.to_string() == id)
            .ok_or_else(NotFound::new)?;

        patch.apply(todo);
        Ok(Json(todo.clone()))
    }
}

pub struct DeleteTodo {
    db: Database,
}

#[async_trait]
impl Handler for DeleteTodo {
    type Inputs = (UrlParameter<TodoId>,);
    type Response = StatusCode;
    type Rejection = Infallible;

    fn inputs(&self) -> Self::Inputs {
        (extract::url_param(),)
    }

    async fn call(&self, inputs: (String,)) -> Result<StatusCode, Infallible> {
        let (id,) = inputs;
        tracing::debug!(%id, "deleting todo");

        self.db.lock().retain(|todo| todo.id.to_string() != id);
        Ok(StatusCode::NO_CONTENT)
    }
}
