use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct ParameterDoc { pub xa: f64, pub xb: f64, pub ya: f64, pub yb: f64, pub iterations: i64 }

#[derive(ToSchema)]
pub struct DimensionDoc { pub width: i64, pub height: i64 }

#[derive(ToSchema)]
pub struct CreateFractalDoc {
    /// Caller-generated id, at most 36 characters
    pub uuid: String,
    pub parameter: ParameterDoc,
    pub dimension: DimensionDoc,
}

#[derive(ToSchema)]
pub struct PublishResultDoc { pub checksum: String, pub duration: f64 }

#[derive(ToSchema)]
pub struct FractalJobDoc {
    pub uuid: String,
    pub parameter: ParameterDoc,
    pub dimension: DimensionDoc,
    pub checksum: String,
    /// Seconds
    pub duration: f64,
}

#[derive(ToSchema)]
pub struct FieldErrorDoc { pub field: String, pub message: String }

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub details: Option<Vec<FieldErrorDoc>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::index,
        crate::routes::fractals::create,
        crate::routes::fractals::publish_result,
    ),
    components(
        schemas(
            ParameterDoc,
            DimensionDoc,
            CreateFractalDoc,
            PublishResultDoc,
            FractalJobDoc,
            FieldErrorDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "fractals")
    )
)]
pub struct ApiDoc;
