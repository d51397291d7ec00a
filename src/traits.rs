/// Trait que deben implementar los directorios de nombres (el trie de ingredientes
/// y la tabla hash de recetas) para resolver un nombre a su handle estable.
///
/// De esta forma se garantiza que las dos estrategias de lookup sean intercambiables
/// para quien solo necesita resolver nombres, y que en los tests se pueda reemplazar
/// el directorio por un mock.
///
/// Nombres iguales devuelven siempre el mismo handle. Los handles de un directorio
/// son independientes de los del otro.
#[cfg_attr(test, mockall::automock)]
pub trait NameDirectory {
    /// Busca el nombre en el directorio sin modificarlo.
    ///
    /// # Arguments
    /// * `name` - Nombre a resolver
    /// # Returns
    /// * `Some(handle)` si el nombre ya estaba registrado, `None` en caso contrario.
    fn lookup(&self, name: &str) -> Option<u32>;

    /// Busca el nombre en el directorio, registrandolo con `next_id` si no existia.
    ///
    /// # Arguments
    /// * `name` - Nombre a registrar
    /// * `next_id` - Handle a asociar al nombre en caso de que todavia no exista
    /// # Returns
    /// * El handle ya asociado al nombre, o `next_id` si el nombre era nuevo.
    fn intern(&mut self, name: &str, next_id: u32) -> u32;
}
