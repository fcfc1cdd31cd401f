#[cfg(feature = "ssr")]
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    use actix_files::Files;
    use actix_web::*;
    use leptos::logging::log;
    use leptos::*;
    use leptos_actix::{generate_route_list, LeptosRoutes};
    use morai::api;
    use morai::app::*;
    use morai::config::Config;
    use morai::store;

    // Storage settings come from the environment; an invalid value stops startup
    let config = Config::from_env().map_err(std::io::Error::other)?;
    let review_store = store::from_config(&config.storage);
    let max_body_bytes = config.max_body_bytes;

    // Load Leptos configuration
    let conf = get_configuration(None).await.map_err(std::io::Error::other)?;
    let addr = conf.leptos_options.site_addr;

    // Generate the list of routes in your Leptos App
    let routes = generate_route_list(App);
    log!("listening on http://{}", &addr);

    HttpServer::new(move || {
        let leptos_options = &conf.leptos_options;
        let site_root = &leptos_options.site_root;

        App::new()
            .app_data(web::Data::from(review_store.clone()))
            .app_data(api::json_config(max_body_bytes))
            // Register API routes BEFORE the Leptos routes
            .service(web::scope("/api").configure(api::configure))
            // Serve JS/WASM/CSS from `pkg`
            .service(Files::new("/pkg", format!("{site_root}/pkg")))
            .service(favicon)
            .leptos_routes(leptos_options.to_owned(), routes.to_owned(), App)
            .app_data(web::Data::new(leptos_options.to_owned()))
    })
    .bind(&addr)?
    .run()
    .await
}

#[cfg(feature = "ssr")]
#[actix_web::get("favicon.ico")]
async fn favicon(
    leptos_options: actix_web::web::Data<leptos::LeptosOptions>,
) -> actix_web::Result<actix_files::NamedFile> {
    let leptos_options = leptos_options.into_inner();
    let site_root = &leptos_options.site_root;
    Ok(actix_files::NamedFile::open(format!(
        "{site_root}/favicon.ico"
    ))?)
}

#[cfg(not(any(feature = "ssr", feature = "csr")))]
pub fn main() {
    // no client-side main function
    // see lib.rs for hydration function instead
}

#[cfg(all(not(feature = "ssr"), feature = "csr"))]
pub fn main() {
    // a client-side main function is required for using `trunk serve`
    // to run: `trunk serve --open --features csr`
    use morai::app::*;

    console_error_panic_hook::set_once();

    leptos::mount_to_body(App);
}
