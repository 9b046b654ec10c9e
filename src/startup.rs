use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Pool, Postgres};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::config::{DatabaseSettings, Settings};
use crate::domain::subscriber_email::SubscriberEmail;
use crate::email_client::EmailClient;
use crate::notification::{
    MailDispatcher, PgSubscriberDirectory, PublishHook, TemplateGenerator,
};
use crate::routes::{
    handle_create_job, handle_create_news, handle_create_office, handle_create_partner,
    handle_create_project, handle_delete_application, handle_delete_job, handle_delete_news,
    handle_delete_office, handle_delete_partner, handle_delete_project, handle_delete_subscriber,
    handle_get_application, handle_get_job, handle_get_news, handle_get_office,
    handle_get_partner, handle_get_project, handle_list_applications, handle_list_jobs,
    handle_list_news, handle_list_offices, handle_list_partners, handle_list_projects,
    handle_list_published_news, handle_list_subscribers, handle_preview_notification,
    handle_public_subscribers, handle_review_application, handle_submit_application,
    handle_subscribe, handle_unsubscribe, handle_update_job, handle_update_news,
    handle_update_office, handle_update_partner, handle_update_project, health_check,
    json_error_handler, path_error_handler, query_error_handler,
};

pub struct Application {
    pub port: u16,
    pub server: Server,
}

/// Staff inbox alerted about every job application.
pub struct AdminEmail(pub SubscriberEmail);

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let db_pool = get_connection_db_pool(&config.database);
        let sender_email = config
            .get_email_client_sender()
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
        let email_client = EmailClient::new(
            config.get_email_client_base_url(),
            sender_email,
            config.get_email_client_api(),
            Some(config.get_email_client_timeout()),
        )
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
        let admin_email = config
            .notification
            .get_admin_email()
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;

        let dispatcher = MailDispatcher::new(
            Arc::new(email_client),
            config.notification.get_dispatch_timeout(),
        );
        let templates = TemplateGenerator::new(
            config.notification.frontend_url.clone(),
            config.notification.organisation_name.clone(),
        );
        let publish_hook = PublishHook::new(
            templates.clone(),
            Arc::new(PgSubscriberDirectory::new(db_pool.clone())),
            dispatcher.clone(),
        );

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();

        tracing::info!("Server listening on {}:{}", config.application.get_host(), port);

        let server = run(
            listener,
            db_pool,
            dispatcher,
            templates,
            publish_hook,
            AdminEmail(admin_email),
        )?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    dispatcher: MailDispatcher,
    templates: TemplateGenerator,
    publish_hook: PublishHook,
    admin_email: AdminEmail,
) -> Result<Server, std::io::Error> {
    let db_pool = web::Data::new(db_pool);
    let dispatcher = web::Data::new(dispatcher);
    let templates = web::Data::new(templates);
    let publish_hook = web::Data::new(publish_hook);
    let admin_email = web::Data::new(admin_email);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/newsletters")
                    .route("", web::get().to(handle_list_subscribers))
                    .route("/public", web::get().to(handle_public_subscribers))
                    .route("/subscribe", web::post().to(handle_subscribe))
                    .route("/unsubscribe", web::post().to(handle_unsubscribe))
                    .route("/{id}", web::delete().to(handle_delete_subscriber)),
            )
            .service(
                web::scope("/news")
                    .route("", web::get().to(handle_list_news))
                    .route("", web::post().to(handle_create_news))
                    // Registered before "/{id}" so "published" is not read as an id
                    .route("/published", web::get().to(handle_list_published_news))
                    .route("/{id}", web::get().to(handle_get_news))
                    .route("/{id}", web::put().to(handle_update_news))
                    .route("/{id}", web::delete().to(handle_delete_news)),
            )
            .service(
                web::scope("/jobs")
                    .route("", web::get().to(handle_list_jobs))
                    .route("", web::post().to(handle_create_job))
                    .route("/{id}", web::get().to(handle_get_job))
                    .route("/{id}", web::put().to(handle_update_job))
                    .route("/{id}", web::delete().to(handle_delete_job)),
            )
            .service(
                web::scope("/projects")
                    .route("", web::get().to(handle_list_projects))
                    .route("", web::post().to(handle_create_project))
                    .route("/{id}", web::get().to(handle_get_project))
                    .route("/{id}", web::put().to(handle_update_project))
                    .route("/{id}", web::delete().to(handle_delete_project)),
            )
            .service(
                web::scope("/applications")
                    .route("", web::get().to(handle_list_applications))
                    .route("", web::post().to(handle_submit_application))
                    .route("/{id}", web::get().to(handle_get_application))
                    .route("/{id}", web::put().to(handle_review_application))
                    .route("/{id}", web::delete().to(handle_delete_application)),
            )
            .service(
                web::scope("/partners")
                    .route("", web::get().to(handle_list_partners))
                    .route("", web::post().to(handle_create_partner))
                    .route("/{id}", web::get().to(handle_get_partner))
                    .route("/{id}", web::put().to(handle_update_partner))
                    .route("/{id}", web::delete().to(handle_delete_partner)),
            )
            .service(
                web::scope("/offices")
                    .route("", web::get().to(handle_list_offices))
                    .route("", web::post().to(handle_create_office))
                    .route("/{id}", web::get().to(handle_get_office))
                    .route("/{id}", web::put().to(handle_update_office))
                    .route("/{id}", web::delete().to(handle_delete_office)),
            )
            .route(
                "/notifications/preview/{content_type}/{id}",
                web::get().to(handle_preview_notification),
            )
            .app_data(db_pool.clone())
            .app_data(dispatcher.clone())
            .app_data(templates.clone())
            .app_data(publish_hook.clone())
            .app_data(admin_email.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> Pool<Postgres> {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.get_db_options())
}
