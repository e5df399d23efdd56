use architect_admin::{Admin, AdminConfig, AdminModel, AttributeKind, FieldKind, NameTransform, RegistrationError};

struct Author;

#[derive(AdminModel)]
#[admin(name = "Blog Posts", table = "posts")]
struct Post {
    #[admin("label=Headline,list,required")]
    title: String,
    #[admin("textarea")]
    body: String,
    #[admin = "-"]
    secret: String,
    author: Box<Author>,
    #[admin("list,min=0")]
    views: i64,
    rating: Option<f64>,
    published_at: chrono::NaiveDateTime,
    #[admin("Field=url,list")]
    homepage: String,
    r#type: &'static str,
    draft: bool,
}

#[derive(AdminModel)]
struct Tag {
    #[admin("list")]
    name: String,
}

#[derive(AdminModel)]
struct Broken {
    #[admin("label=,list")]
    title: String,
}

fn post() -> Post {
    Post {
        title: String::new(),
        body: String::new(),
        secret: String::new(),
        author: Box::new(Author),
        views: 0,
        rating: None,
        published_at: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap(),
        homepage: String::new(),
        r#type: "",
        draft: false,
    }
}

fn admin(transform: Option<NameTransform>) -> Admin {
    let mut config = AdminConfig::new("admin", "secret", "postgres://localhost/admin_test");
    if let Some(t) = transform {
        config = config.with_name_transform(t);
    }
    Admin::setup(config).unwrap()
}

#[test]
fn derive_lists_attributes_in_declaration_order() {
    let attrs = Post::attributes();
    let names: Vec<&str> = attrs.iter().map(|a| a.name).collect();
    assert_eq!(
        names,
        vec!["title", "body", "secret", "author", "views", "rating", "published_at", "homepage", "type", "draft"]
    );
    let kinds: Vec<AttributeKind> = attrs.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![
            AttributeKind::Str,
            AttributeKind::Str,
            AttributeKind::Str,
            AttributeKind::Reference,
            AttributeKind::Int,
            AttributeKind::Float,
            AttributeKind::Struct,
            AttributeKind::Str,
            AttributeKind::Str,
            AttributeKind::Bool,
        ]
    );
    assert_eq!(attrs[2].tag, "-");
    assert_eq!(attrs[1].tag, "textarea");
    assert_eq!(attrs[3].tag, "");
}

#[test]
fn derive_emits_struct_options() {
    assert_eq!(post().admin_name().as_deref(), Some("Blog Posts"));
    assert_eq!(Post::table_name(), Some("posts"));
    assert_eq!(Tag { name: String::new() }.admin_name(), None);
    assert_eq!(Tag::table_name(), None);
}

#[tokio::test]
async fn derived_model_registers_with_transform() {
    let admin = admin(Some(NameTransform::snake_case()));
    let model = admin.group("Blog").register_model(post()).unwrap();

    assert_eq!(model.name(), "Blog Posts");
    assert_eq!(model.slug(), "blog-posts");
    assert_eq!(model.table_name(), "posts");
    assert_eq!(
        model.field_names(),
        vec!["title", "body", "authorId", "views", "rating", "published_at", "homepage", "type", "draft"]
    );
    assert_eq!(model.field_by_name("authorId").map(|f| f.column_name()), Some("author_id"));
    let kinds: Vec<FieldKind> = model.fields().iter().map(|f| f.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            FieldKind::Text,
            FieldKind::Text,
            FieldKind::Text,
            FieldKind::Integer,
            FieldKind::Float,
            FieldKind::Time,
            FieldKind::Url,
            FieldKind::Text,
            FieldKind::Text,
        ]
    );
    assert_eq!(model.list_labels(), vec!["Headline", "views", "homepage"]);
    assert!(model.instance::<Post>().is_some());
}

#[tokio::test]
async fn plain_struct_uses_its_type_name() {
    let admin = admin(None);
    let model = admin.group("Meta").register_model(Tag { name: "x".into() }).unwrap();
    assert_eq!(model.name(), "Tag");
    assert_eq!(model.slug(), "tag");
    assert_eq!(model.table_name(), "Tag");
    assert_eq!(model.table_columns(), vec!["name"]);
    assert_eq!(admin.model_url("tag", "/new/"), "/admin/model/tag/new/");
}

#[tokio::test]
async fn malformed_annotation_is_reported_and_nothing_registers() {
    let admin = admin(None);
    let err = admin.group("Bad").register_model(Broken { title: String::new() }).unwrap_err();
    assert!(matches!(err, RegistrationError::MalformedAnnotation { .. }));
    assert_eq!(err.attribute(), Some("title"));
    assert!(admin.model("broken").is_none());
    assert!(admin.groups()[0].models.is_empty());
}
