use std::collections::VecDeque;

use log::debug;

use crate::recipes::RecipeIngredient;
use crate::traits::NameDirectory;
use crate::trie::Trie;

/// Handle estable de un ingrediente dentro de la despensa.
pub type IngredientId = u32;

/// Lote de un ingrediente: una cantidad uniforme con un mismo tick de vencimiento.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lot {
    pub quantity: u64,
    pub expiration_time: u64,
}

/// Representa un ingrediente de la despensa
#[derive(Debug)]
pub struct Ingredient {
    /// Nombre del ingrediente
    pub name: String,

    /// Suma de las cantidades de todos los lotes de la lista. Puede sobrecontar
    /// lotes ya vencidos hasta que la proxima barrida los descuente.
    pub total_quantity: u64,

    /// Lotes ordenados por vencimiento ascendente.
    /// Los empates de vencimiento mantienen el orden de insercion.
    pub lots: VecDeque<Lot>,

    /// Ultimo reloj con el que se barrieron los lotes vencidos, para no recorrer
    /// la lista dos veces dentro del mismo tick.
    last_swept_at: Option<u64>,
}

/// La despensa: todos los ingredientes con sus lotes, mas el directorio que
/// resuelve nombres de ingredientes a handles.
///
/// El directorio es generico sobre `NameDirectory` para poder reemplazarlo por un
/// mock en los tests; en la pasticceria real es el trie de `trie.rs`.
///
/// Los ingredientes nunca se destruyen durante una ejecucion, asi que el handle
/// de un ingrediente es su posicion dentro del vector.
pub struct Pantry<D: NameDirectory = Trie> {
    pub directory: D,
    pub ingredients: Vec<Ingredient>,
}

impl Pantry<Trie> {
    /// Crea una despensa vacia sobre el trie de ingredientes.
    pub fn new() -> Self {
        Pantry::with_directory(Trie::new())
    }
}

impl Default for Pantry<Trie> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: NameDirectory> Pantry<D> {
    /// Crea una despensa vacia sobre un directorio de nombres especifico.
    pub fn with_directory(directory: D) -> Self {
        Pantry {
            directory,
            ingredients: Vec::new(),
        }
    }

    /// Resuelve el nombre de un ingrediente a su handle, creando el registro del
    /// ingrediente (sin lotes) si el nombre era nuevo.
    pub fn intern(&mut self, name: &str) -> IngredientId {
        let next_id = self.ingredients.len() as IngredientId;
        let id = self.directory.intern(name, next_id);
        if id == next_id {
            self.ingredients.push(Ingredient {
                name: name.to_string(),
                total_quantity: 0,
                lots: VecDeque::new(),
                last_swept_at: None,
            });
        }
        id
    }

    /// Busca el handle de un ingrediente sin crearlo.
    pub fn lookup(&self, name: &str) -> Option<IngredientId> {
        self.directory.lookup(name)
    }

    /// Acceso a un ingrediente por su handle.
    pub fn ingredient(&self, id: IngredientId) -> Option<&Ingredient> {
        self.ingredients.get(id as usize)
    }

    /// Agrega un lote nuevo al ingrediente manteniendo la lista ordenada por
    /// vencimiento. Un lote con el mismo vencimiento que otros ya existentes se
    /// inserta despues de ellos.
    ///
    /// La cantidad total se actualiza incondicionalmente: si el lote ya llego
    /// vencido, la proxima barrida lo descuenta.
    pub fn replenish(&mut self, name: &str, quantity: u64, expiration_time: u64) {
        let id = self.intern(name);
        let ingredient = &mut self.ingredients[id as usize];
        ingredient.total_quantity += quantity;

        let position = ingredient
            .lots
            .iter()
            .rposition(|lot| lot.expiration_time <= expiration_time)
            .map(|position| position + 1)
            .unwrap_or(0);
        ingredient.lots.insert(
            position,
            Lot {
                quantity,
                expiration_time,
            },
        );

        debug!(
            "[ DESPENSA ] +{} de \"{}\" con vencimiento {}",
            quantity, ingredient.name, expiration_time
        );
    }

    /// Intenta reservar los ingredientes de una receta para un pedido de
    /// `order_quantity` batches, consultando los lotes con el reloj `now`.
    ///
    /// Primero se barren los vencidos y se verifica que la cantidad viva alcance
    /// para **todos** los ingredientes; recien despues se consume. Si alguno no
    /// alcanza, la despensa queda exactamente como estaba.
    ///
    /// # Arguments
    /// * `requirements` - Lista de ingredientes de la receta con sus unidades por batch
    /// * `order_quantity` - Cantidad de batches del pedido
    /// * `now` - Reloj con el que se consultan los vencimientos
    /// # Returns
    /// * `true` si se descontaron todas las cantidades, `false` si algun ingrediente no alcanzaba.
    pub fn try_reserve(
        &mut self,
        requirements: &[RecipeIngredient],
        order_quantity: u64,
        now: u64,
    ) -> bool {
        for requirement in requirements {
            self.sweep_expired(requirement.ingredient, now);
            let ingredient = &self.ingredients[requirement.ingredient as usize];
            if ingredient.total_quantity < requirement.quantity * order_quantity {
                return false;
            }
        }

        for requirement in requirements {
            self.consume(requirement.ingredient, requirement.quantity * order_quantity);
        }

        true
    }

    /// Barre desde el frente todos los lotes con vencimiento anterior al reloj
    /// recibido: un lote con `expiration_time` igual al reloj sigue vivo.
    ///
    /// La barrida se memoiza por ingrediente: si ya se barrio con este mismo reloj
    /// no se vuelve a recorrer la lista.
    pub fn sweep_expired(&mut self, id: IngredientId, now: u64) {
        let ingredient = &mut self.ingredients[id as usize];
        if ingredient.last_swept_at == Some(now) {
            return;
        }
        ingredient.last_swept_at = Some(now);

        while let Some(lot) = ingredient.lots.front().copied() {
            if lot.expiration_time >= now {
                break;
            }
            ingredient.lots.pop_front();
            ingredient.total_quantity -= lot.quantity;
            debug!(
                "[ DESPENSA ] vencio un lote de {} de \"{}\"",
                lot.quantity, ingredient.name
            );
        }
    }

    /// Consume unidades del ingrediente empezando siempre por el lote que vence antes.
    ///
    /// El que llama ya barrio los vencidos y verifico que `total_quantity` alcanza.
    /// El ultimo lote tocado se parte si le sobra cantidad; un lote que queda en
    /// cero se elimina de la lista.
    fn consume(&mut self, id: IngredientId, units: u64) {
        let ingredient = &mut self.ingredients[id as usize];
        ingredient.total_quantity -= units;

        let mut needed = units;
        while needed > 0 {
            let head_quantity = match ingredient.lots.front() {
                Some(lot) => lot.quantity,
                None => break,
            };

            if head_quantity <= needed {
                ingredient.lots.pop_front();
                needed -= head_quantity;
            } else {
                if let Some(lot) = ingredient.lots.front_mut() {
                    lot.quantity -= needed;
                }
                needed = 0;
            }
        }
    }
}
