use std::env;

use log::LevelFilter;

/// Constantes definidas mediante variables de entorno.
///
/// Un ejemplo de archivo `.env` para definir las variables de entorno podria ser:
///
/// ```txt
///     TRIE_POOL_NODES = "200"
///     RECIPE_BUCKETS = "92233"
/// ```
pub struct Consts;
impl Consts {
    /// Cantidad de nodos a reservar de entrada para el pool del trie de ingredientes,
    /// obtenida de la variable de entorno TRIE_POOL_NODES. El pool crece mas alla
    /// de este valor si hace falta.
    /// Por defecto 200
    pub fn trie_pool_nodes() -> usize {
        env::var("TRIE_POOL_NODES")
            .unwrap_or("200".to_string())
            .parse::<usize>()
            .unwrap_or(200)
    }

    /// Cantidad de buckets de la tabla hash de recetas, obtenida de la variable
    /// de entorno RECIPE_BUCKETS. Conviene que sea un numero primo.
    /// Por defecto 92233
    pub fn recipe_buckets() -> usize {
        env::var("RECIPE_BUCKETS")
            .unwrap_or("92233".to_string())
            .parse::<usize>()
            .unwrap_or(92233)
    }
}

/// Longitud maxima de los nombres de recetas e ingredientes.
pub const MAX_NAME_LEN: usize = 255;

/// Inicializa el logger.
/// Lee la variable de entorno `RUST_LOG` para definir el nivel de log.
///
/// Por defecto el nivel de log es `INFO`.
pub fn init_logger() {
    env_logger::builder()
        .filter(
            None,
            env::var("RUST_LOG")
                .unwrap_or_default()
                .parse::<LevelFilter>()
                .unwrap_or(LevelFilter::Info),
        )
        .format_timestamp(None)
        .init();
}
