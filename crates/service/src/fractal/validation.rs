//! Schema validation for request bodies.
//!
//! Each parser walks the whole body and reports every offending field rather
//! than stopping at the first one. Unknown fields are ignored.
//!
//! Coercion rules:
//! - float: JSON number, or a string holding a finite number
//! - integer: JSON integer, JSON float without fractional part, or a string holding an integer
//! - string: JSON string, or a JSON number rendered as text
//!
//! No lossy casts: `100.5` is not an integer (it is rejected, not truncated),
//! and `true`, `null`, arrays and objects never become an id or checksum.

use serde_json::{Map, Value};

use models::fractal::{Dimension, Parameter, MAX_ID_LEN};

use crate::errors::FieldError;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateJobRequest {
    pub id: String,
    pub parameter: Parameter,
    pub dimension: Dimension,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishResultRequest {
    pub checksum: String,
    pub duration: f64,
}

pub fn coerce_float(v: &Value) -> Option<f64> {
    let f = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    f.is_finite().then_some(f)
}

pub fn coerce_int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub fn coerce_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Collects field errors while reading one object.
struct Reader<'o, 'e> {
    obj: &'o Map<String, Value>,
    prefix: &'o str,
    errors: &'e mut Vec<FieldError>,
}

impl<'o, 'e> Reader<'o, 'e> {
    fn name(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.prefix, key)
        }
    }

    fn read<T>(&mut self, key: &str, what: &str, coerce: fn(&Value) -> Option<T>) -> Option<T> {
        let Some(raw) = self.obj.get(key) else {
            let field = self.name(key);
            self.errors.push(FieldError::new(field, "is required"));
            return None;
        };
        let out = coerce(raw);
        if out.is_none() {
            let field = self.name(key);
            self.errors.push(FieldError::new(field, format!("must be {what}")));
        }
        out
    }

    fn float(&mut self, key: &str) -> Option<f64> {
        self.read(key, "a number", coerce_float)
    }

    fn int(&mut self, key: &str) -> Option<i64> {
        self.read(key, "an integer", coerce_int)
    }

    fn string(&mut self, key: &str) -> Option<String> {
        self.read(key, "a string", coerce_string)
    }

    fn object(&mut self, key: &str) -> Option<&'o Map<String, Value>> {
        let obj: &'o Map<String, Value> = self.obj;
        match obj.get(key) {
            Some(Value::Object(m)) => Some(m),
            Some(_) => {
                let field = self.name(key);
                self.errors.push(FieldError::new(field, "must be an object"));
                None
            }
            None => {
                let field = self.name(key);
                self.errors.push(FieldError::new(field, "is required"));
                None
            }
        }
    }
}

fn body_object(body: &Value) -> Result<&Map<String, Value>, Vec<FieldError>> {
    body.as_object().ok_or_else(|| vec![FieldError::new("body", "must be a JSON object")])
}

fn check_id(id: String, errors: &mut Vec<FieldError>) -> Option<String> {
    if id.trim().is_empty() {
        errors.push(FieldError::new("uuid", "must not be empty"));
        return None;
    }
    if id.chars().count() > MAX_ID_LEN {
        errors.push(FieldError::new("uuid", format!("must be at most {MAX_ID_LEN} characters")));
        return None;
    }
    Some(id)
}

fn read_parameter(obj: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<Parameter> {
    let mut r = Reader { obj, prefix: "parameter", errors };
    let xa = r.float("xa");
    let xb = r.float("xb");
    let ya = r.float("ya");
    let yb = r.float("yb");
    let iterations = r.int("iterations");
    Some(Parameter { xa: xa?, xb: xb?, ya: ya?, yb: yb?, iterations: iterations? })
}

fn read_dimension(obj: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<Dimension> {
    let mut r = Reader { obj, prefix: "dimension", errors };
    let width = r.int("width");
    let height = r.int("height");
    Some(Dimension { width: width?, height: height? })
}

/// Validate a `POST /v1/fractals` body.
pub fn parse_create_job(body: &Value) -> Result<CreateJobRequest, Vec<FieldError>> {
    let obj = body_object(body)?;
    let mut errors = Vec::new();

    let mut r = Reader { obj, prefix: "", errors: &mut errors };
    let id = r.string("uuid");
    let parameter = r.object("parameter");
    let dimension = r.object("dimension");

    let id = id.and_then(|id| check_id(id, &mut errors));
    let parameter = parameter.and_then(|p| read_parameter(p, &mut errors));
    let dimension = dimension.and_then(|d| read_dimension(d, &mut errors));

    match (id, parameter, dimension) {
        (Some(id), Some(parameter), Some(dimension)) if errors.is_empty() => {
            Ok(CreateJobRequest { id, parameter, dimension })
        }
        _ => Err(errors),
    }
}

/// Validate a `POST /v1/fractals/{id}/result` body. Both fields are required.
pub fn parse_publish_result(body: &Value) -> Result<PublishResultRequest, Vec<FieldError>> {
    let obj = body_object(body)?;
    let mut errors = Vec::new();

    let mut r = Reader { obj, prefix: "", errors: &mut errors };
    let checksum = r.string("checksum");
    let duration = r.float("duration");

    match (checksum, duration) {
        (Some(checksum), Some(duration)) if errors.is_empty() => {
            Ok(PublishResultRequest { checksum, duration })
        }
        _ => Err(errors),
    }
}
