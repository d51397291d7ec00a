use log::debug;

use crate::enums::RemoveRecipeResult;
use crate::utils::Consts;

/// Handle estable de una receta dentro del store.
pub type RecipeId = u32;

/// Ingrediente de una receta: el handle del ingrediente en la despensa
/// y las unidades necesarias por batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeIngredient {
    pub ingredient: u32,
    pub quantity: u64,
}

/// Representa una receta
#[derive(Debug)]
pub struct Recipe {
    /// Nombre de la receta
    pub name: String,

    /// Peso de un batch: la suma de las unidades por batch de todos sus ingredientes.
    /// Se calcula al crear la receta y no cambia nunca.
    pub weight: u64,

    /// Cantidad de pedidos vivos (pendientes o despachables) que referencian esta receta.
    /// Mientras sea mayor a cero la receta no puede eliminarse.
    pub order_count: u32,

    /// Lista ordenada de ingredientes con sus unidades por batch
    pub ingredients: Vec<RecipeIngredient>,
}

/// Store de recetas.
///
/// Los nombres se resuelven con una tabla hash encadenada con hashing djb2 y una
/// cantidad fija de buckets, asi el costo de buscar o registrar una receta es
/// O(|nombre|) mas el recorrido de la cadena del bucket.
///
/// Las recetas viven en un slab con free list para que los `RecipeId` se mantengan
/// estables aunque se eliminen recetas intermedias: los pedidos guardan el handle
/// de su receta hasta que el camioncino los despacha.
pub struct RecipeStore {
    buckets: Vec<Vec<RecipeId>>,
    slab: Vec<Option<Recipe>>,
    free: Vec<RecipeId>,
}

/// Computa el hash djb2 del nombre: hash * 33 + c por cada byte.
fn djb2_hash(name: &str) -> u64 {
    name.bytes()
        .fold(5381_u64, |hash, c| hash.wrapping_mul(33).wrapping_add(u64::from(c)))
}

impl RecipeStore {
    /// Crea el store con la cantidad de buckets de `Consts::recipe_buckets()`.
    pub fn new() -> Self {
        Self::with_buckets(Consts::recipe_buckets())
    }

    /// Crea el store con una cantidad especifica de buckets.
    /// En los tests sirve para forzar colisiones con un solo bucket.
    pub fn with_buckets(bucket_count: usize) -> Self {
        RecipeStore {
            buckets: vec![Vec::new(); bucket_count],
            slab: Vec::new(),
            free: Vec::new(),
        }
    }

    fn bucket_of(&self, name: &str) -> usize {
        (djb2_hash(name) % self.buckets.len() as u64) as usize
    }

    /// Devuelve true si el slot del slab esta vivo y tiene ese nombre.
    fn entry_has_name(&self, id: RecipeId, name: &str) -> bool {
        self.slab[id as usize]
            .as_ref()
            .map(|recipe| recipe.name == name)
            .unwrap_or(false)
    }

    /// Busca una receta por nombre.
    pub fn find(&self, name: &str) -> Option<RecipeId> {
        self.buckets[self.bucket_of(name)]
            .iter()
            .copied()
            .find(|id| self.entry_has_name(*id, name))
    }

    /// Registra una receta nueva con su lista de ingredientes. El peso queda fijado
    /// como la suma de las unidades por batch.
    ///
    /// # Returns
    /// * `Some(id)` con el handle de la receta creada.
    /// * `None` si el nombre ya estaba asociado a una receta; no se modifica nada.
    pub fn add(&mut self, name: &str, ingredients: Vec<RecipeIngredient>) -> Option<RecipeId> {
        if self.find(name).is_some() {
            return None;
        }

        let weight = ingredients.iter().map(|i| i.quantity).sum();
        let recipe = Recipe {
            name: name.to_string(),
            weight,
            order_count: 0,
            ingredients,
        };

        let id = match self.free.pop() {
            Some(id) => {
                self.slab[id as usize] = Some(recipe);
                id
            }
            None => {
                self.slab.push(Some(recipe));
                (self.slab.len() - 1) as RecipeId
            }
        };

        let bucket = self.bucket_of(name);
        self.buckets[bucket].push(id);

        debug!("[ RICETTE ] receta \"{}\" registrada con peso {}", name, weight);
        Some(id)
    }

    /// Elimina una receta por nombre, salvo que tenga pedidos vivos.
    pub fn remove(&mut self, name: &str) -> RemoveRecipeResult {
        let bucket = self.bucket_of(name);
        let position = self.buckets[bucket]
            .iter()
            .position(|id| self.entry_has_name(*id, name));

        let position = match position {
            Some(position) => position,
            None => return RemoveRecipeResult::NotFound,
        };

        let id = self.buckets[bucket][position];
        let has_orders = self.slab[id as usize]
            .as_ref()
            .map(|recipe| recipe.order_count > 0)
            .unwrap_or(false);
        if has_orders {
            return RemoveRecipeResult::HasOrders;
        }

        self.buckets[bucket].remove(position);
        self.slab[id as usize] = None;
        self.free.push(id);

        debug!("[ RICETTE ] receta \"{}\" eliminada", name);
        RemoveRecipeResult::Removed
    }

    /// Acceso a una receta viva por su handle.
    pub fn get(&self, id: RecipeId) -> Option<&Recipe> {
        self.slab.get(id as usize).and_then(|slot| slot.as_ref())
    }

    /// Idem a get() pero con acceso mutable.
    pub fn get_mut(&mut self, id: RecipeId) -> Option<&mut Recipe> {
        self.slab.get_mut(id as usize).and_then(|slot| slot.as_mut())
    }
}

impl Default for RecipeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests_recipes {
    use super::*;

    fn ingredients_of(pairs: &[(u32, u64)]) -> Vec<RecipeIngredient> {
        pairs
            .iter()
            .map(|(ingredient, quantity)| RecipeIngredient {
                ingredient: *ingredient,
                quantity: *quantity,
            })
            .collect()
    }

    #[test]
    fn test1_add_computes_the_weight_and_find_returns_the_handle() {
        let mut store = RecipeStore::with_buckets(16);
        let id = store.add("torta", ingredients_of(&[(0, 2), (1, 1)])).unwrap();

        assert_eq!(store.find("torta"), Some(id));
        assert_eq!(store.get(id).unwrap().weight, 3);
        assert_eq!(store.get(id).unwrap().order_count, 0);
    }

    #[test]
    fn test2_add_with_a_duplicated_name_is_ignored() {
        let mut store = RecipeStore::with_buckets(16);
        let id = store.add("torta", ingredients_of(&[(0, 2)])).unwrap();

        assert!(store.add("torta", ingredients_of(&[(1, 9)])).is_none());
        // la receta original queda intacta
        assert_eq!(store.get(id).unwrap().weight, 2);
    }

    #[test]
    fn test3_remove_of_an_unknown_name_twice_returns_not_found_both_times() {
        let mut store = RecipeStore::with_buckets(16);
        assert_eq!(store.remove("torta"), RemoveRecipeResult::NotFound);
        assert_eq!(store.remove("torta"), RemoveRecipeResult::NotFound);
    }

    #[test]
    fn test4_remove_is_refused_while_the_recipe_has_live_orders() {
        let mut store = RecipeStore::with_buckets(16);
        let id = store.add("torta", ingredients_of(&[(0, 2)])).unwrap();
        store.get_mut(id).unwrap().order_count = 1;

        assert_eq!(store.remove("torta"), RemoveRecipeResult::HasOrders);
        assert_eq!(store.find("torta"), Some(id));

        store.get_mut(id).unwrap().order_count = 0;
        assert_eq!(store.remove("torta"), RemoveRecipeResult::Removed);
        assert_eq!(store.find("torta"), None);
    }

    #[test]
    fn test5_add_after_remove_reuses_the_slab_slot() {
        let mut store = RecipeStore::with_buckets(16);
        let id = store.add("torta", ingredients_of(&[(0, 2)])).unwrap();
        assert_eq!(store.remove("torta"), RemoveRecipeResult::Removed);

        let reused = store.add("crostata", ingredients_of(&[(0, 5)])).unwrap();
        assert_eq!(reused, id);
        assert_eq!(store.find("crostata"), Some(reused));
    }

    #[test]
    fn test6_colliding_names_in_the_same_bucket_stay_independent() {
        // con un solo bucket todos los nombres colisionan entre si
        let mut store = RecipeStore::with_buckets(1);
        let torta = store.add("torta", ingredients_of(&[(0, 2)])).unwrap();
        let pane = store.add("pane", ingredients_of(&[(1, 4)])).unwrap();
        let brioche = store.add("brioche", ingredients_of(&[(2, 6)])).unwrap();

        assert_eq!(store.remove("pane"), RemoveRecipeResult::Removed);
        assert_eq!(store.find("torta"), Some(torta));
        assert_eq!(store.find("brioche"), Some(brioche));
        assert_eq!(store.find("pane"), None);
        assert_ne!(torta, pane);
    }
}
